//! Route definitions for the aggregation endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Routes mounted at `/stats`.
///
/// ```text
/// GET /dashboard   -> dashboard (owner-scoped, ?user_id=)
/// GET /ranking     -> ranking (?page=&pageSize=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(stats::dashboard))
        .route("/ranking", get(stats::ranking))
}

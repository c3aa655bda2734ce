pub mod health;
pub mod processor;
pub mod stats;
pub mod video;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /videos                        list, upload, batch delete
/// /videos/{id}                   get, update, delete (cascade)
/// /videos/{id}/analysis          start, get, delete (per ?hand=)
/// /stats/dashboard               owner-scoped dashboard aggregation
/// /stats/ranking                 cross-user ranking board
/// /processor/start|stop|status   supervised scoring processor
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/videos", video::router())
        .nest("/stats", stats::router())
        .nest("/processor", processor::router())
}

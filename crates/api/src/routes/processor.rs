//! Route definitions for the supervised scoring processor.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::processor;
use crate::state::AppState;

/// Routes mounted at `/processor`.
///
/// ```text
/// POST /start    -> start_processor
/// POST /stop     -> stop_processor
/// GET  /status   -> processor_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(processor::start_processor))
        .route("/stop", post(processor::stop_processor))
        .route("/status", get(processor::processor_status))
}

//! Handlers for the supervised scoring processor instance.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use swinglab_scoring::ProcessorState;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Lifecycle state payload.
#[derive(Debug, Serialize)]
pub struct ProcessorStatus {
    pub state: ProcessorState,
}

/// POST /api/v1/processor/start
///
/// Rejected with 409 when the processor is already running.
pub async fn start_processor(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.supervisor.start().await?;
    Ok(Json(DataResponse {
        data: ProcessorStatus {
            state: state.supervisor.state().await,
        },
    }))
}

/// POST /api/v1/processor/stop
///
/// Rejected with 409 when the processor is not running.
pub async fn stop_processor(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.supervisor.stop().await?;
    Ok(Json(DataResponse {
        data: ProcessorStatus {
            state: state.supervisor.state().await,
        },
    }))
}

/// GET /api/v1/processor/status
pub async fn processor_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: ProcessorStatus {
            state: state.supervisor.state().await,
        },
    }))
}

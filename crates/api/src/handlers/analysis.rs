//! Handlers for per-(video, hand) analysis runs.
//!
//! The heavy lifting lives in [`crate::engine::orchestrator`]; these
//! handlers only parse parameters and shape responses.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use swinglab_core::error::CoreError;
use swinglab_core::hand::Hand;
use swinglab_core::types::DbId;
use swinglab_db::models::analysis::StartAnalysis;
use swinglab_db::repositories::AnalysisRepo;

use crate::engine::orchestrator;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters carrying the hand selection.
#[derive(Debug, Deserialize)]
pub struct HandQuery {
    pub hand: Option<String>,
}

/// Parse the required `hand` query parameter.
fn require_hand(params: &HandQuery) -> Result<Hand, AppError> {
    let raw = params
        .hand
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("hand query parameter is required".into()))?;
    Ok(Hand::parse(raw)?)
}

/// POST /api/v1/videos/{id}/analysis
///
/// Starts (or short-circuits to) the analysis for the requested hand.
/// Blocks until the scoring run finishes; a scoring failure comes back
/// as an error response after the error state is persisted.
pub async fn start_analysis(
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
    Json(input): Json<StartAnalysis>,
) -> AppResult<impl IntoResponse> {
    let analysis = orchestrator::start_analysis(&state, video_id, &input).await?;
    Ok(Json(DataResponse { data: analysis }))
}

/// GET /api/v1/videos/{id}/analysis?hand=
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
    Query(params): Query<HandQuery>,
) -> AppResult<impl IntoResponse> {
    let hand = require_hand(&params)?;
    let analysis = AnalysisRepo::find_by_video_and_hand(&state.pool, video_id, hand)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Analysis",
            id: video_id,
        }))?;
    Ok(Json(DataResponse { data: analysis }))
}

/// DELETE /api/v1/videos/{id}/analysis?hand=
pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
    Query(params): Query<HandQuery>,
) -> AppResult<StatusCode> {
    let hand = require_hand(&params)?;
    orchestrator::delete_analysis(&state, video_id, hand).await?;
    Ok(StatusCode::NO_CONTENT)
}

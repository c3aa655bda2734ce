//! Handlers for the `/videos` resource.
//!
//! Upload persists the file and row, then hands duration/thumbnail
//! extraction to a detached probe task; the response never waits for it.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use swinglab_core::artifacts;
use swinglab_core::error::CoreError;
use swinglab_core::types::DbId;
use swinglab_db::models::video::{CreateVideo, UpdateVideo, Video, VideoListQuery};
use swinglab_db::repositories::VideoRepo;

use crate::engine::lifecycle::{self, BatchDeleteOutcome};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Upload size cap (500 MiB).
pub const MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

/// Title length cap, matching the VARCHAR(255) column.
const MAX_TITLE_LEN: usize = 255;

/// Description length cap.
const MAX_DESCRIPTION_LEN: usize = 1000;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `DELETE /videos`.
#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    pub video_ids: Vec<DbId>,
}

/// Response for `GET /videos`.
#[derive(Debug, Serialize)]
pub struct VideoListResponse {
    pub videos: Vec<Video>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate user-supplied title/description.
fn validate_details(title: &str, description: Option<&str>) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "video title must not be empty".into(),
        )));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(AppError::Core(CoreError::Validation(format!(
            "video title exceeds {MAX_TITLE_LEN} characters"
        ))));
    }
    if description.is_some_and(|d| d.len() > MAX_DESCRIPTION_LEN) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "description exceeds {MAX_DESCRIPTION_LEN} characters"
        ))));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/videos
///
/// Multipart upload: `title`, optional `description`, `user_id`, and the
/// `video` file. Returns 201 with the row in its pre-probe state
/// (status `unprocessed`, duration 0).
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut user_id: Option<DbId> = None;
    let mut file: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        match field.name().unwrap_or("") {
            "title" => {
                title = Some(field.text().await.map_err(bad_field)?);
            }
            "description" => {
                description = Some(field.text().await.map_err(bad_field)?);
            }
            "user_id" => {
                let raw = field.text().await.map_err(bad_field)?;
                user_id = Some(
                    raw.parse()
                        .map_err(|_| AppError::BadRequest("user_id must be an integer".into()))?,
                );
            }
            "video" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(bad_field)?;
                file = Some((original_name, bytes));
            }
            other => {
                tracing::debug!(field = other, "ignoring unknown multipart field");
            }
        }
    }

    let title = title.ok_or_else(|| AppError::BadRequest("title is required".into()))?;
    validate_details(&title, description.as_deref())?;
    let user_id = user_id.ok_or_else(|| AppError::BadRequest("user_id is required".into()))?;
    let (original_name, bytes) =
        file.ok_or_else(|| AppError::BadRequest("video file is required".into()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("video file is empty".into()));
    }

    // Failure to persist the primary file is a real error, not a
    // best-effort cleanup path.
    let file_name = artifacts::unique_file_name(&original_name);
    let file_path = artifacts::save_file(
        &state.config.storage_root,
        artifacts::VIDEO_DIR,
        &file_name,
        &bytes,
    )
    .await
    .map_err(|e| AppError::InternalError(format!("failed to persist uploaded file: {e}")))?;

    let input = CreateVideo {
        title,
        description,
        file_path: file_path.clone(),
        file_size: bytes.len() as i64,
        user_id,
    };
    let video = VideoRepo::create(&state.pool, &input).await?;

    tracing::info!(
        video_id = video.id,
        user_id,
        file_size = video.file_size,
        "video uploaded",
    );

    lifecycle::spawn_probe(
        state.pool.clone(),
        state.config.storage_root.clone(),
        video.id,
        file_path,
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: video })))
}

fn bad_field(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("invalid multipart field: {e}"))
}

/// GET /api/v1/videos?user_id=&page=&limit=
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<VideoListQuery>,
) -> AppResult<impl IntoResponse> {
    let (videos, total) =
        VideoRepo::list_by_owner(&state.pool, params.user_id, params.page, params.limit).await?;

    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let page = params.page.unwrap_or(1).max(1);
    let total_pages = (total + limit - 1) / limit;

    Ok(Json(DataResponse {
        data: VideoListResponse {
            videos,
            total,
            page,
            total_pages,
        },
    }))
}

/// GET /api/v1/videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))?;
    Ok(Json(DataResponse { data: video }))
}

/// PUT /api/v1/videos/{id}
pub async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVideo>,
) -> AppResult<impl IntoResponse> {
    validate_details(&input.title, input.description.as_deref())?;

    let video = VideoRepo::update_details(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))?;
    Ok(Json(DataResponse { data: video }))
}

/// DELETE /api/v1/videos/{id}
///
/// Cascades per the lifecycle rules; tolerant of already-missing files.
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    lifecycle::delete_video(&state.pool, &state.config.storage_root, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/videos
///
/// Batch delete with a structured per-item result list, so callers can
/// distinguish full from partial success.
pub async fn delete_videos(
    State(state): State<AppState>,
    Json(input): Json<BatchDeleteRequest>,
) -> AppResult<Json<DataResponse<Vec<BatchDeleteOutcome>>>> {
    if input.video_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "video_ids must not be empty".into(),
        )));
    }

    let outcomes =
        lifecycle::delete_videos(&state.pool, &state.config.storage_root, &input.video_ids).await;
    Ok(Json(DataResponse { data: outcomes }))
}

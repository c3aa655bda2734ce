//! Video entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use swinglab_core::types::{DbId, Timestamp};

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Storage-root-relative path of the uploaded file.
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    /// Duration in seconds; 0 until the probe step fills it in.
    pub duration: i32,
    pub file_size: i64,
    pub status: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a freshly uploaded video.
#[derive(Debug)]
pub struct CreateVideo {
    pub title: String,
    pub description: Option<String>,
    pub file_path: String,
    pub file_size: i64,
    pub user_id: DbId,
}

/// Body for `PUT /videos/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateVideo {
    pub title: String,
    pub description: Option<String>,
}

/// Query parameters for `GET /videos`.
#[derive(Debug, Deserialize)]
pub struct VideoListQuery {
    pub user_id: DbId,
    /// 1-based page number. Defaults to 1.
    pub page: Option<i64>,
    /// Page size. Defaults to 10, capped at 100.
    pub limit: Option<i64>,
}

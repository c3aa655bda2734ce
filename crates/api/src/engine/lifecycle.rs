//! Video lifecycle: the post-upload probe step and the delete cascades.
//!
//! The probe runs detached from the upload request; its failure is never
//! fatal to the upload. Deletes cascade through analysis rows and
//! physical files, and every cleanup step is independently caught so one
//! failure never aborts the rest.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sqlx::PgPool;
use swinglab_core::artifacts;
use swinglab_core::error::CoreError;
use swinglab_core::media;
use swinglab_core::types::DbId;
use swinglab_db::repositories::{AnalysisRepo, VideoRepo};

use crate::error::{AppError, AppResult};

/// Per-item result of a batch delete.
#[derive(Debug, Serialize)]
pub struct BatchDeleteOutcome {
    pub video_id: DbId,
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Spawn the detached probe task for a freshly uploaded video.
pub fn spawn_probe(pool: PgPool, storage_root: PathBuf, video_id: DbId, file_path: String) {
    tokio::spawn(async move {
        run_probe(&pool, &storage_root, video_id, &file_path).await;
    });
}

/// Extract duration and a thumbnail, then record the result.
///
/// On any probe failure the duration is forced to 0 and the status left
/// untouched; the video stays usable without metadata.
async fn run_probe(pool: &PgPool, storage_root: &Path, video_id: DbId, file_path: &str) {
    let video_abs = artifacts::resolve(storage_root, file_path);
    let stem = video_abs
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| video_id.to_string());
    let thumbnail_rel = format!("{}/thumbnail-{stem}.jpg", artifacts::THUMBNAIL_DIR);
    let thumbnail_abs = storage_root.join(&thumbnail_rel);

    let (duration, thumbnail) = tokio::join!(
        media::probe_duration(&video_abs),
        media::generate_thumbnail(&video_abs, &thumbnail_abs),
    );

    let result = match (duration, thumbnail) {
        (Ok(secs), Ok(())) => {
            let rounded = media::rounded_duration(secs);
            tracing::info!(video_id, duration = rounded, "video probe completed");
            VideoRepo::record_probe(pool, video_id, rounded, Some(thumbnail_rel.as_str())).await
        }
        (duration, thumbnail) => {
            if let Err(e) = &duration {
                tracing::error!(video_id, error = %e, "duration probe failed");
            }
            if let Err(e) = &thumbnail {
                tracing::error!(video_id, error = %e, "thumbnail generation failed");
            }
            VideoRepo::record_probe_failure(pool, video_id).await
        }
    };

    if let Err(e) = result {
        tracing::error!(video_id, error = %e, "failed to record probe result");
    }
}

/// Delete a video and everything derived from it.
///
/// Cascade order: analysis rows (manifests collected first), segment
/// artifacts, primary file, thumbnail, then the video row. A missing
/// physical file is expected and not an error; any other cleanup failure
/// is logged and the cascade continues.
pub async fn delete_video(pool: &PgPool, storage_root: &Path, video_id: DbId) -> AppResult<()> {
    let video = VideoRepo::find_by_id(pool, video_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id: video_id,
        }))?;

    let analyses = AnalysisRepo::list_by_video(pool, video_id).await?;
    let removed_rows = AnalysisRepo::delete_by_video(pool, video_id).await?;
    tracing::debug!(video_id, removed_rows, "analysis rows removed");

    for analysis in &analyses {
        artifacts::remove_manifest(storage_root, analysis.output_arr.as_ref()).await;
    }

    match artifacts::delete_file(storage_root, &video.file_path).await {
        Ok(true) => {}
        Ok(false) => tracing::debug!(video_id, "video file already absent"),
        Err(e) => tracing::warn!(video_id, error = %e, "failed to delete video file"),
    }

    if let Some(thumbnail) = &video.thumbnail_path {
        match artifacts::delete_file(storage_root, thumbnail).await {
            Ok(_) => {}
            Err(e) => tracing::warn!(video_id, error = %e, "failed to delete thumbnail"),
        }
    }

    VideoRepo::delete(pool, video_id).await?;
    tracing::info!(video_id, "video deleted");
    Ok(())
}

/// Batch delete: the same cascade per id, continuing past failures.
///
/// Every requested id gets an entry in the result, so callers can tell
/// full success from partial; unknown ids come back as not deleted.
pub async fn delete_videos(
    pool: &PgPool,
    storage_root: &Path,
    video_ids: &[DbId],
) -> Vec<BatchDeleteOutcome> {
    let mut outcomes = Vec::with_capacity(video_ids.len());
    for &video_id in video_ids {
        match delete_video(pool, storage_root, video_id).await {
            Ok(()) => outcomes.push(BatchDeleteOutcome {
                video_id,
                deleted: true,
                error: None,
            }),
            Err(e) => {
                tracing::warn!(video_id, error = %e, "batch delete item failed");
                outcomes.push(BatchDeleteOutcome {
                    video_id,
                    deleted: false,
                    error: Some(e.to_string()),
                });
            }
        }
    }
    outcomes
}

//! Repository for the `videos` table.

use sqlx::PgPool;
use swinglab_core::status::VideoStatus;
use swinglab_core::types::DbId;

use crate::models::video::{CreateVideo, UpdateVideo, Video};

/// Column list for `videos` queries.
const COLUMNS: &str = "\
    id, title, description, file_path, thumbnail_path, duration, \
    file_size, status, user_id, created_at, updated_at";

/// Maximum page size for video listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for video listing.
const DEFAULT_LIMIT: i64 = 10;

/// Provides CRUD operations for uploaded videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a freshly uploaded video. Status starts `unprocessed` with
    /// duration 0 until the probe step runs.
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos (title, description, file_path, file_size, user_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.file_path)
            .bind(input.file_size)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Owner-scoped page of videos, newest first. Returns the page plus
    /// the owner's total count.
    pub async fn list_by_owner(
        pool: &PgPool,
        user_id: DbId,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<(Vec<Video>, i64), sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let page = page.unwrap_or(1).max(1);
        let offset = (page - 1) * limit;

        let query = format!(
            "SELECT {COLUMNS} FROM videos \
             WHERE user_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        let videos = sqlx::query_as::<_, Video>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok((videos, total))
    }

    /// Update title/description. Returns `None` when the video is gone.
    pub async fn update_details(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVideo,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos \
             SET title = $2, description = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Set the processing status, unconditionally.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: VideoStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE videos SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a successful probe: duration, thumbnail, and an explicit
    /// `unprocessed` status.
    pub async fn record_probe(
        pool: &PgPool,
        id: DbId,
        duration: i32,
        thumbnail_path: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE videos \
             SET duration = $2, thumbnail_path = $3, status = $4, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(duration)
        .bind(thumbnail_path)
        .bind(VideoStatus::Unprocessed.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Probe failure path: force duration to 0, leave status untouched.
    pub async fn record_probe_failure(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE videos SET duration = 0, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete the row. Returns the number of rows removed (0 or 1).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

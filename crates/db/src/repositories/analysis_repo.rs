//! Repository for the `video_analyses` table.
//!
//! The named unique constraint `uq_video_analyses_video_hand` is the
//! only concurrency guard for the (video, hand) pair. [`create_if_absent`]
//! leans on it with `ON CONFLICT DO NOTHING`: zero rows back means a
//! concurrent or stale run already holds the pair, and the caller
//! decides what that means.
//!
//! [`create_if_absent`]: AnalysisRepo::create_if_absent

use sqlx::PgPool;
use swinglab_core::hand::Hand;
use swinglab_core::status::{AnalysisStatus, VideoStatus};
use swinglab_core::types::DbId;

use crate::models::analysis::{Analysis, CompleteAnalysis};

/// Column list for `video_analyses` queries.
const COLUMNS: &str = "\
    id, video_id, hand_choice, case_arr, score_arr, output_arr, \
    average_score, suggestions, status, error_message, created_at, updated_at";

/// Provides lifecycle operations for per-(video, hand) scoring runs.
pub struct AnalysisRepo;

impl AnalysisRepo {
    pub async fn find_by_video_and_hand(
        pool: &PgPool,
        video_id: DbId,
        hand: Hand,
    ) -> Result<Option<Analysis>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM video_analyses WHERE video_id = $1 AND hand_choice = $2");
        sqlx::query_as::<_, Analysis>(&query)
            .bind(video_id)
            .bind(hand.as_str())
            .fetch_optional(pool)
            .await
    }

    /// All runs for one video, for the delete cascade.
    pub async fn list_by_video(pool: &PgPool, video_id: DbId) -> Result<Vec<Analysis>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM video_analyses WHERE video_id = $1");
        sqlx::query_as::<_, Analysis>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }

    /// Conditional insert of a fresh `processing` run.
    ///
    /// Returns `None` when the unique constraint already holds a row for
    /// this pair -- the store, not the application, arbitrates the race.
    pub async fn create_if_absent(
        pool: &PgPool,
        video_id: DbId,
        hand: Hand,
    ) -> Result<Option<Analysis>, sqlx::Error> {
        let query = format!(
            "INSERT INTO video_analyses (video_id, hand_choice, status) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (video_id, hand_choice) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Analysis>(&query)
            .bind(video_id)
            .bind(hand.as_str())
            .bind(AnalysisStatus::Processing.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Re-analysis primitive: drop any existing run for the pair and
    /// create the replacement in the same transaction, so no observer
    /// ever sees the pair without a row mid-swap.
    ///
    /// Returns the prior row (for artifact cleanup) and the fresh one.
    pub async fn replace(
        pool: &PgPool,
        video_id: DbId,
        hand: Hand,
    ) -> Result<(Option<Analysis>, Analysis), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let delete = format!(
            "DELETE FROM video_analyses WHERE video_id = $1 AND hand_choice = $2 \
             RETURNING {COLUMNS}"
        );
        let prior = sqlx::query_as::<_, Analysis>(&delete)
            .bind(video_id)
            .bind(hand.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let insert = format!(
            "INSERT INTO video_analyses (video_id, hand_choice, status) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let fresh = sqlx::query_as::<_, Analysis>(&insert)
            .bind(video_id)
            .bind(hand.as_str())
            .bind(AnalysisStatus::Processing.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((prior, fresh))
    }

    /// Persist a successful scoring outcome and flip the video to
    /// `processed`, atomically.
    pub async fn finalize_success(
        pool: &PgPool,
        analysis_id: DbId,
        video_id: DbId,
        outcome: &CompleteAnalysis,
    ) -> Result<Analysis, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE video_analyses \
             SET case_arr = $2, score_arr = $3, output_arr = $4, average_score = $5, \
                 suggestions = $6, status = $7, error_message = NULL, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let analysis = sqlx::query_as::<_, Analysis>(&query)
            .bind(analysis_id)
            .bind(&outcome.case_arr)
            .bind(&outcome.score_arr)
            .bind(&outcome.output_arr)
            .bind(outcome.average_score)
            .bind(&outcome.suggestions)
            .bind(AnalysisStatus::Completed.as_str())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE videos SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(video_id)
            .bind(VideoStatus::Processed.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(analysis)
    }

    /// Persist a scoring failure on both rows, atomically.
    pub async fn finalize_failure(
        pool: &PgPool,
        analysis_id: DbId,
        video_id: DbId,
        error_message: &str,
    ) -> Result<Analysis, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE video_analyses \
             SET status = $2, error_message = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let analysis = sqlx::query_as::<_, Analysis>(&query)
            .bind(analysis_id)
            .bind(AnalysisStatus::Error.as_str())
            .bind(error_message)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE videos SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(video_id)
            .bind(VideoStatus::Error.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(analysis)
    }

    /// Delete one run. Returns the removed row so the caller can clean
    /// up its artifact manifest, or `None` when there was nothing.
    pub async fn delete_by_video_and_hand(
        pool: &PgPool,
        video_id: DbId,
        hand: Hand,
    ) -> Result<Option<Analysis>, sqlx::Error> {
        let query = format!(
            "DELETE FROM video_analyses WHERE video_id = $1 AND hand_choice = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Analysis>(&query)
            .bind(video_id)
            .bind(hand.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete every run for a video. Returns the number removed.
    pub async fn delete_by_video(pool: &PgPool, video_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM video_analyses WHERE video_id = $1")
            .bind(video_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

//! Read-only aggregation queries for the dashboard and ranking board.
//!
//! Everything here recomputes from the source rows on every call; there
//! is no materialized state to invalidate. SQL does the owner-scoped
//! counting and summing; the windowing/bucketing arithmetic lives in
//! `swinglab_core::aggregation`.

use sqlx::PgPool;
use swinglab_core::types::{DbId, Timestamp};

use crate::models::stats::{
    RecentAnalysisRow, TrendRow, UserScoreRow, UserVideoTotalsRow, WeeklyVideoRow,
};

/// Size of the recent-analysis feed.
const RECENT_FEED_LIMIT: i64 = 10;

/// Provides the aggregate reads behind `/stats`.
pub struct StatsRepo;

impl StatsRepo {
    pub async fn count_videos(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn sum_durations(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(duration), 0)::BIGINT FROM videos WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    pub async fn count_analyses(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM video_analyses a \
             JOIN videos v ON v.id = a.video_id \
             WHERE v.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Videos created inside the trailing window (`created_at >= since`).
    pub async fn weekly_videos(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<WeeklyVideoRow>, sqlx::Error> {
        sqlx::query_as::<_, WeeklyVideoRow>(
            "SELECT duration, created_at FROM videos \
             WHERE user_id = $1 AND created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// Average scores of analyses attached to window videos.
    pub async fn weekly_scores(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<Option<f64>>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT a.average_score FROM video_analyses a \
             JOIN videos v ON v.id = a.video_id \
             WHERE v.user_id = $1 AND v.created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// Every `score_arr` column value for the owner, across all analyses
    /// regardless of status.
    pub async fn score_arrays(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Option<serde_json::Value>>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT a.score_arr FROM video_analyses a \
             JOIN videos v ON v.id = a.video_id \
             WHERE v.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Full time-ordered trend rows, oldest first, unfiltered by window.
    pub async fn score_trend(pool: &PgPool, user_id: DbId) -> Result<Vec<TrendRow>, sqlx::Error> {
        sqlx::query_as::<_, TrendRow>(
            "SELECT v.title, a.average_score, a.created_at \
             FROM video_analyses a \
             LEFT JOIN videos v ON v.id = a.video_id \
             WHERE v.user_id = $1 \
             ORDER BY a.created_at ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Latest analyses for the recent-activity feed.
    pub async fn recent_analyses(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RecentAnalysisRow>, sqlx::Error> {
        sqlx::query_as::<_, RecentAnalysisRow>(
            "SELECT a.video_id, v.title, a.average_score, a.status, a.hand_choice, a.created_at \
             FROM video_analyses a \
             LEFT JOIN videos v ON v.id = a.video_id \
             WHERE v.user_id = $1 \
             ORDER BY a.created_at DESC \
             LIMIT $2",
        )
        .bind(user_id)
        .bind(RECENT_FEED_LIMIT)
        .fetch_all(pool)
        .await
    }

    /// Per-user duration/count totals across all users.
    ///
    /// Durations are summed from videos alone -- joining analyses here
    /// would multiply each duration by its analysis count.
    pub async fn user_video_totals(pool: &PgPool) -> Result<Vec<UserVideoTotalsRow>, sqlx::Error> {
        sqlx::query_as::<_, UserVideoTotalsRow>(
            "SELECT user_id, \
                    COALESCE(SUM(duration), 0)::BIGINT AS total_duration, \
                    COUNT(*) AS video_count, \
                    MAX(created_at) AS last_activity \
             FROM videos \
             GROUP BY user_id",
        )
        .fetch_all(pool)
        .await
    }

    /// Per-user mean of analysis average scores. `AVG` ignores rows
    /// whose score is still NULL (incomplete runs).
    pub async fn user_score_averages(pool: &PgPool) -> Result<Vec<UserScoreRow>, sqlx::Error> {
        sqlx::query_as::<_, UserScoreRow>(
            "SELECT v.user_id, AVG(a.average_score) AS average_score \
             FROM video_analyses a \
             JOIN videos v ON v.id = a.video_id \
             GROUP BY v.user_id",
        )
        .fetch_all(pool)
        .await
    }
}

//! Row shapes for the aggregation queries.
//!
//! These are read-only projections; the arithmetic on top of them lives
//! in `swinglab_core::aggregation` and `swinglab_core::ranking`.

use sqlx::FromRow;
use swinglab_core::types::{DbId, Timestamp};

/// One video inside the 7-day trailing window.
#[derive(Debug, FromRow)]
pub struct WeeklyVideoRow {
    pub duration: i32,
    pub created_at: Timestamp,
}

/// One analysis joined with its video title, for the score trend.
#[derive(Debug, FromRow)]
pub struct TrendRow {
    pub title: Option<String>,
    pub average_score: Option<f64>,
    pub created_at: Timestamp,
}

/// One analysis for the recent-activity feed.
#[derive(Debug, FromRow)]
pub struct RecentAnalysisRow {
    pub video_id: DbId,
    pub title: Option<String>,
    pub average_score: Option<f64>,
    pub status: Option<String>,
    pub hand_choice: Option<String>,
    pub created_at: Timestamp,
}

/// Per-user video totals for the ranking board.
#[derive(Debug, FromRow)]
pub struct UserVideoTotalsRow {
    pub user_id: DbId,
    pub total_duration: i64,
    pub video_count: i64,
    pub last_activity: Option<Timestamp>,
}

/// Per-user mean of analysis average scores.
#[derive(Debug, FromRow)]
pub struct UserScoreRow {
    pub user_id: DbId,
    pub average_score: Option<f64>,
}

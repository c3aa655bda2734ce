//! Handlers for the dashboard and ranking aggregations.
//!
//! Everything is recomputed from the record store per request; the SQL
//! side does the owner-scoped fetching, `swinglab_core` the arithmetic.

use axum::extract::{Query, State};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use swinglab_core::aggregation::{self, ScoreDistribution, UploadBucket};
use swinglab_core::ranking::{self, UserTraining};
use swinglab_core::types::{DbId, Timestamp};
use swinglab_db::repositories::StatsRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Placeholder for fields that failed to resolve.
const UNKNOWN: &str = "unknown";

/// Default and maximum ranking page sizes.
const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

/// Header carrying the pre-pagination ranking total.
const TOTAL_COUNT_HEADER: &str = "x-total-count";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query params for `GET /stats/dashboard`.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub user_id: DbId,
}

/// Query params for `GET /stats/ranking`.
#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    pub page: Option<usize>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<usize>,
}

/// One point of the score trend.
#[derive(Debug, Serialize)]
pub struct TrendPoint {
    pub title: String,
    pub score: f64,
    pub date: Timestamp,
}

/// One entry of the recent-analysis feed.
#[derive(Debug, Serialize)]
pub struct RecentAnalysisItem {
    pub video_id: DbId,
    pub video_title: String,
    pub date: Timestamp,
    pub score: f64,
    pub status: String,
    pub hand: String,
}

/// Response for `GET /stats/dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_videos: i64,
    pub total_duration: i64,
    pub total_analyses: i64,
    pub weekly_trainings: i64,
    pub weekly_duration: i64,
    pub weekly_average_score: f64,
    pub weekly_uploads: i64,
    pub upload_trend: Vec<UploadBucket>,
    pub score_distribution: ScoreDistribution,
    pub score_trend: Vec<TrendPoint>,
    pub recent_analysis: Vec<RecentAnalysisItem>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/stats/dashboard?user_id=
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> AppResult<impl IntoResponse> {
    let pool = &state.pool;
    let user_id = params.user_id;

    let now = Local::now();
    let since = aggregation::weekly_window_start(&now).with_timezone(&Utc);

    let total_videos = StatsRepo::count_videos(pool, user_id).await?;
    let total_duration = StatsRepo::sum_durations(pool, user_id).await?;
    let total_analyses = StatsRepo::count_analyses(pool, user_id).await?;

    let weekly_videos = StatsRepo::weekly_videos(pool, user_id, since).await?;
    let weekly_duration: i64 = weekly_videos.iter().map(|v| i64::from(v.duration)).sum();
    let weekly_created: Vec<Timestamp> = weekly_videos.iter().map(|v| v.created_at).collect();

    let weekly_scores: Vec<f64> = StatsRepo::weekly_scores(pool, user_id, since)
        .await?
        .into_iter()
        .flatten()
        .filter(|s| s.is_finite())
        .collect();
    let weekly_average_score = aggregation::mean(&weekly_scores);

    let upload_trend = aggregation::upload_trend(&now, &weekly_created);

    let score_arrays = StatsRepo::score_arrays(pool, user_id).await?;
    let score_distribution = aggregation::distribution(score_arrays.iter().flatten());

    let score_trend = StatsRepo::score_trend(pool, user_id)
        .await?
        .into_iter()
        .map(|row| TrendPoint {
            title: row.title.unwrap_or_else(|| UNKNOWN.into()),
            score: row.average_score.unwrap_or(0.0),
            date: row.created_at,
        })
        .collect();

    let recent_analysis = StatsRepo::recent_analyses(pool, user_id)
        .await?
        .into_iter()
        .map(|row| RecentAnalysisItem {
            video_id: row.video_id,
            video_title: row.title.unwrap_or_else(|| UNKNOWN.into()),
            date: row.created_at,
            score: row.average_score.unwrap_or(0.0),
            status: row.status.unwrap_or_else(|| UNKNOWN.into()),
            hand: row.hand_choice.unwrap_or_else(|| UNKNOWN.into()),
        })
        .collect();

    let weekly_trainings = weekly_videos.len() as i64;
    Ok(Json(DataResponse {
        data: DashboardStats {
            total_videos,
            total_duration,
            total_analyses,
            weekly_trainings,
            weekly_duration,
            weekly_average_score,
            weekly_uploads: weekly_trainings,
            upload_trend,
            score_distribution,
            score_trend,
            recent_analysis,
        },
    }))
}

/// GET /api/v1/stats/ranking?page=&pageSize=
///
/// Cross-user board ordered by accumulated training duration. The
/// pre-pagination total rides in the `x-total-count` header.
pub async fn ranking(
    State(state): State<AppState>,
    Query(params): Query<RankingQuery>,
) -> AppResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let totals = StatsRepo::user_video_totals(&state.pool).await?;
    let scores: std::collections::HashMap<DbId, f64> =
        StatsRepo::user_score_averages(&state.pool)
            .await?
            .into_iter()
            .filter_map(|row| row.average_score.map(|avg| (row.user_id, avg)))
            .collect();

    let entries: Vec<UserTraining> = totals
        .into_iter()
        .map(|row| UserTraining {
            user_id: row.user_id,
            total_duration: row.total_duration,
            average_score: scores.get(&row.user_id).copied().unwrap_or(0.0),
            video_count: row.video_count,
            last_activity: row.last_activity,
        })
        .collect();

    let ranked = ranking::rank(entries);
    let total = ranked.len();
    let items = ranking::page_slice(&ranked, page, page_size);

    Ok((
        AppendHeaders([(TOTAL_COUNT_HEADER, total.to_string())]),
        Json(DataResponse { data: items }),
    ))
}

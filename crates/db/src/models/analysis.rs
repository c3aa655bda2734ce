//! Analysis entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use swinglab_core::hand::Hand;
use swinglab_core::types::{DbId, Timestamp};

/// A row from the `video_analyses` table.
///
/// `average_score` is only meaningful when `status` is `completed`;
/// `output_arr` doubles as the artifact manifest for cleanup.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Analysis {
    pub id: DbId,
    pub video_id: DbId,
    pub hand_choice: String,
    pub case_arr: Option<serde_json::Value>,
    pub score_arr: Option<serde_json::Value>,
    pub output_arr: Option<serde_json::Value>,
    pub average_score: Option<f64>,
    pub suggestions: Option<serde_json::Value>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body for `POST /videos/{id}/analysis`.
#[derive(Debug, Deserialize)]
pub struct StartAnalysis {
    pub hand: Hand,
    /// Discard any existing run for this (video, hand) and score again.
    #[serde(default)]
    pub re_analyze: bool,
}

/// Successful scoring outcome to persist on the analysis row.
#[derive(Debug)]
pub struct CompleteAnalysis {
    pub case_arr: serde_json::Value,
    pub score_arr: serde_json::Value,
    pub output_arr: serde_json::Value,
    pub average_score: f64,
    pub suggestions: Option<serde_json::Value>,
}

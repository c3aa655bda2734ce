//! HTTP client for the scoring processor's `/analyze` endpoint.
//!
//! One blocking request per scoring run, bounded by a hard timeout.
//! Every failure mode collapses into [`ScoringError`]; the client never
//! retries -- retry policy, if any, belongs to the caller.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use swinglab_core::hand::Hand;

/// Hard bound on one scoring request (5 minutes).
pub const SCORING_TIMEOUT: Duration = Duration::from_secs(300);

/// Request body for `POST {processor}/analyze`.
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    video_path: &'a str,
    hand: &'a str,
}

/// Response payload from the scoring processor.
///
/// The per-segment arrays are kept as raw JSON: the processor decides
/// segment granularity and nesting, and the aggregation layer tolerates
/// both.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringResult {
    #[serde(default)]
    pub case_arr: serde_json::Value,
    #[serde(default)]
    pub score_arr: serde_json::Value,
    #[serde(default)]
    pub output_arr: serde_json::Value,
    pub average_score: f64,
    #[serde(default)]
    pub suggestions: Option<serde_json::Value>,
}

/// Errors from the scoring client.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    /// The request exceeded the hard timeout.
    #[error("scoring request timed out after {0:?}")]
    Timeout(Duration),

    /// The request itself failed (connect, DNS, TLS, ...).
    #[error("scoring request failed: {0}")]
    Request(reqwest::Error),

    /// The processor answered with a non-success status.
    #[error("scoring processor error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response body did not match the contract.
    #[error("malformed scoring response: {0}")]
    Malformed(String),
}

/// Client for a single scoring processor instance.
pub struct ScoringClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ScoringClient {
    /// Create a client with the default 5-minute bound.
    pub fn new(base_url: String) -> Self {
        Self::with_timeout(base_url, SCORING_TIMEOUT)
    }

    pub fn with_timeout(base_url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            timeout,
        }
    }

    /// Score one video for one hand.
    ///
    /// Blocks the calling task for up to the configured timeout. The
    /// path must be absolute -- the processor resolves it on its own
    /// filesystem, not relative to this service.
    pub async fn score(&self, video_path: &Path, hand: Hand) -> Result<ScoringResult, ScoringError> {
        let body = AnalyzeRequest {
            video_path: &video_path.to_string_lossy(),
            hand: hand.as_str(),
        };

        tracing::info!(
            video_path = %video_path.display(),
            hand = %hand,
            "submitting video to scoring processor",
        );

        let response = self
            .client
            .post(format!("{}/analyze", self.base_url))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScoringError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let result: ScoringResult = response
            .json()
            .await
            .map_err(|e| ScoringError::Malformed(e.to_string()))?;

        validate(&result)?;
        Ok(result)
    }

    fn classify_transport_error(&self, error: reqwest::Error) -> ScoringError {
        if error.is_timeout() {
            ScoringError::Timeout(self.timeout)
        } else {
            ScoringError::Request(error)
        }
    }
}

/// Contract validation beyond what deserialization enforces.
fn validate(result: &ScoringResult) -> Result<(), ScoringError> {
    if !result.average_score.is_finite() {
        return Err(ScoringError::Malformed(
            "average_score is not a finite number".into(),
        ));
    }
    if !(0.0..=100.0).contains(&result.average_score) {
        return Err(ScoringError::Malformed(format!(
            "average_score {} outside 0-100",
            result.average_score
        )));
    }
    Ok(())
}

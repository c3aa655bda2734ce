//! Dashboard statistics aggregation.
//!
//! Every dashboard query is recomputed from the record store on demand;
//! nothing here caches. The repositories hand over raw owner-scoped rows
//! and the functions in this module do the windowing, bucketing, and
//! averaging.
//!
//! Scores arrive from the scoring processor as JSON arrays. Entries may be
//! nested one level (`[85]` means the same as `85`) and anything
//! non-numeric is skipped rather than failing the whole computation.

use chrono::{DateTime, Datelike, Days, LocalResult, TimeZone};
use serde::Serialize;

use crate::types::Timestamp;

/// Bucket boundaries for the score distribution.
const EXCELLENT_MIN: f64 = 90.0;
const GOOD_MIN: f64 = 80.0;
const FAIR_MIN: f64 = 70.0;

/// Quality band for a single segment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Counts of segment scores per quality band.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    pub excellent: u64,
    pub good: u64,
    pub fair: u64,
    pub poor: u64,
}

/// One day of the 7-day upload trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadBucket {
    /// Calendar-day label, `M/D` in local time.
    pub day: String,
    pub count: i64,
}

/// Classify a segment score into its quality band.
pub fn classify(score: f64) -> ScoreBand {
    if score >= EXCELLENT_MIN {
        ScoreBand::Excellent
    } else if score >= GOOD_MIN {
        ScoreBand::Good
    } else if score >= FAIR_MIN {
        ScoreBand::Fair
    } else {
        ScoreBand::Poor
    }
}

/// Extract the numeric value from one `score_arr` entry.
///
/// The processor sometimes wraps a segment score in a single-element
/// array; unwrap one level before reading the number. Non-numeric
/// entries yield `None`.
pub fn segment_score(entry: &serde_json::Value) -> Option<f64> {
    let value = match entry {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    value.as_f64().filter(|v| v.is_finite())
}

/// Tally every segment score in the given `score_arr` column values.
///
/// Each item is expected to be a JSON array of segment scores; values
/// that are not arrays (including `null`) contribute nothing.
pub fn distribution<'a, I>(score_arrays: I) -> ScoreDistribution
where
    I: IntoIterator<Item = &'a serde_json::Value>,
{
    let mut dist = ScoreDistribution::default();
    for array in score_arrays {
        let Some(items) = array.as_array() else {
            tracing::debug!("score_arr is not an array, skipping");
            continue;
        };
        for entry in items {
            let Some(score) = segment_score(entry) else {
                continue;
            };
            match classify(score) {
                ScoreBand::Excellent => dist.excellent += 1,
                ScoreBand::Good => dist.good += 1,
                ScoreBand::Fair => dist.fair += 1,
                ScoreBand::Poor => dist.poor += 1,
            }
        }
    }
    dist
}

/// Start of the 7-day trailing window: local midnight, seven days ago.
///
/// A video created exactly at this instant falls inside the window
/// (comparisons are `>=`).
pub fn weekly_window_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let day = now.date_naive() - Days::new(7);
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .expect("00:00:00 is a valid time of day");
    match now.timezone().from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        // Midnight skipped by a DST jump: fall back to the UTC reading.
        LocalResult::None => now.timezone().from_utc_datetime(&midnight),
    }
}

/// Day-bucketed upload counts for the 7 calendar days ending today.
///
/// Bucket keys are calendar dates in the timezone of `now`; each upload
/// timestamp is converted before comparison.
pub fn upload_trend<Tz: TimeZone>(now: &DateTime<Tz>, uploads: &[Timestamp]) -> Vec<UploadBucket> {
    let tz = now.timezone();
    let today = now.date_naive();
    let local_dates: Vec<chrono::NaiveDate> = uploads
        .iter()
        .map(|t| t.with_timezone(&tz).date_naive())
        .collect();

    (0..7u64)
        .map(|i| {
            let date = today - Days::new(6 - i);
            let count = local_dates.iter().filter(|d| **d == date).count() as i64;
            UploadBucket {
                day: format!("{}/{}", date.month(), date.day()),
                count,
            }
        })
        .collect()
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

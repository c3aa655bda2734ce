//! FFmpeg/FFprobe media probe collaborator.
//!
//! The upload probe step needs exactly two things from a source video:
//! its duration and a single representative thumbnail frame.

use std::path::Path;

use serde::Deserialize;

/// Thumbnail dimensions for the upload probe.
pub const THUMB_WIDTH: i32 = 640;
pub const THUMB_HEIGHT: i32 = 360;

/// Error type for media probe operations.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("ffprobe/ffmpeg binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffprobe/ffmpeg execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to parse ffprobe output: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("video file not found: {0}")]
    VideoNotFound(String),
}

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

/// Top-level ffprobe JSON output (`-print_format json -show_format -show_streams`).
#[derive(Debug, Deserialize)]
pub struct FfprobeOutput {
    #[serde(default)]
    pub streams: Vec<FfprobeStream>,
    pub format: FfprobeFormat,
}

/// A single stream from ffprobe output.
#[derive(Debug, Deserialize)]
pub struct FfprobeStream {
    pub duration: Option<String>,
}

/// Format-level metadata from ffprobe.
#[derive(Debug, Deserialize)]
pub struct FfprobeFormat {
    pub duration: Option<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run `ffprobe` on a video file and return its duration in seconds.
///
/// Prefers the format-level duration, falling back to the first stream
/// that reports one. A present-but-unparseable duration reads as `0.0`.
pub async fn probe_duration(path: &Path) -> Result<f64, MediaError> {
    let probe = probe_video(path).await?;
    Ok(parse_duration(&probe))
}

/// Run `ffprobe` on a video file and return the parsed JSON output.
pub async fn probe_video(path: &Path) -> Result<FfprobeOutput, MediaError> {
    if !path.exists() {
        return Err(MediaError::VideoNotFound(
            path.to_string_lossy().to_string(),
        ));
    }

    let output = tokio::process::Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .await
        .map_err(MediaError::NotFound)?;

    if !output.status.success() {
        return Err(MediaError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str::<FfprobeOutput>(&stdout)
        .map_err(|e| MediaError::ParseError(format!("{e}: {stdout}")))
}

/// Pull the duration (seconds) out of a probe result.
pub fn parse_duration(probe: &FfprobeOutput) -> f64 {
    let raw = probe
        .format
        .duration
        .as_deref()
        .or_else(|| probe.streams.iter().find_map(|s| s.duration.as_deref()));
    raw.and_then(|d| d.parse::<f64>().ok()).unwrap_or(0.0)
}

/// Coerce a probed duration into the persisted integer form.
///
/// Negative, NaN, or infinite readings all collapse to 0.
pub fn rounded_duration(duration_secs: f64) -> i32 {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return 0;
    }
    duration_secs.round().min(i32::MAX as f64) as i32
}

/// Extract the first frame of a video as a JPEG thumbnail.
pub async fn generate_thumbnail(video_path: &Path, output_path: &Path) -> Result<(), MediaError> {
    if !video_path.exists() {
        return Err(MediaError::VideoNotFound(
            video_path.to_string_lossy().to_string(),
        ));
    }

    if let Some(parent) = output_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let output = tokio::process::Command::new("ffmpeg")
        .args(["-y", "-ss", "0", "-i"])
        .arg(video_path)
        .args([
            "-vframes",
            "1",
            "-s",
            &format!("{THUMB_WIDTH}x{THUMB_HEIGHT}"),
            "-q:v",
            "2",
        ])
        .arg(output_path)
        .output()
        .await
        .map_err(MediaError::NotFound)?;

    if !output.status.success() {
        return Err(MediaError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_prefers_format_level() {
        let probe: FfprobeOutput = serde_json::from_str(
            r#"{"streams": [{"duration": "10.5"}], "format": {"duration": "42.4"}}"#,
        )
        .unwrap();
        assert_eq!(parse_duration(&probe), 42.4);
    }

    #[test]
    fn parse_duration_falls_back_to_stream() {
        let probe: FfprobeOutput =
            serde_json::from_str(r#"{"streams": [{}, {"duration": "10.5"}], "format": {}}"#)
                .unwrap();
        assert_eq!(parse_duration(&probe), 10.5);
    }

    #[test]
    fn parse_duration_non_numeric_is_zero() {
        let probe: FfprobeOutput =
            serde_json::from_str(r#"{"streams": [], "format": {"duration": "N/A"}}"#).unwrap();
        assert_eq!(parse_duration(&probe), 0.0);
    }

    #[test]
    fn rounded_duration_coerces_bad_values() {
        assert_eq!(rounded_duration(42.4), 42);
        assert_eq!(rounded_duration(42.5), 43);
        assert_eq!(rounded_duration(0.0), 0);
        assert_eq!(rounded_duration(-3.0), 0);
        assert_eq!(rounded_duration(f64::NAN), 0);
        assert_eq!(rounded_duration(f64::INFINITY), 0);
    }

    #[tokio::test]
    async fn probe_missing_file_errors() {
        let err = probe_duration(Path::new("/nonexistent/clip.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::VideoNotFound(_)));
    }
}

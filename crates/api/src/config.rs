use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `330`).
    ///
    /// Must exceed the scoring timeout: an analyze request legitimately
    /// blocks for the whole scoring run.
    pub request_timeout_secs: u64,
    /// Root directory for uploaded videos, thumbnails, and scoring
    /// artifacts. Resolved to an absolute path at load time.
    pub storage_root: PathBuf,
    /// Base URL of the external scoring processor.
    pub processor_url: String,
    /// Hard bound on one scoring request in seconds (default: `300`).
    pub scoring_timeout_secs: u64,
    /// Command used to launch a local scoring processor instance,
    /// whitespace-separated.
    pub processor_cmd: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                              |
    /// |------------------------|--------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                            |
    /// | `PORT`                 | `3000`                               |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`              |
    /// | `REQUEST_TIMEOUT_SECS` | `330`                                |
    /// | `STORAGE_ROOT`         | `storage`                            |
    /// | `PROCESSOR_URL`        | `http://localhost:8766`              |
    /// | `SCORING_TIMEOUT_SECS` | `300`                                |
    /// | `PROCESSOR_CMD`        | `python processor/scoring_service.py`|
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "330".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let storage_root = PathBuf::from(
            std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage".into()),
        );
        let storage_root = std::path::absolute(&storage_root).unwrap_or(storage_root);

        let processor_url =
            std::env::var("PROCESSOR_URL").unwrap_or_else(|_| "http://localhost:8766".into());

        let scoring_timeout_secs: u64 = std::env::var("SCORING_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("SCORING_TIMEOUT_SECS must be a valid u64");

        let processor_cmd: Vec<String> = std::env::var("PROCESSOR_CMD")
            .unwrap_or_else(|_| "python processor/scoring_service.py".into())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage_root,
            processor_url,
            scoring_timeout_secs,
            processor_cmd,
        }
    }
}

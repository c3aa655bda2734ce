use std::sync::Arc;

use swinglab_scoring::{ProcessorSupervisor, ScoringClient};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: swinglab_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client for the external scoring processor.
    pub scoring: Arc<ScoringClient>,
    /// Supervisor for a locally launched scoring processor instance.
    pub supervisor: Arc<ProcessorSupervisor>,
}

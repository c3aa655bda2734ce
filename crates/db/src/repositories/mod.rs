//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-step mutations
//! that must not leave partial state (scoring finalization, the
//! re-analysis delete-then-create pair) run inside a single transaction.

pub mod analysis_repo;
pub mod stats_repo;
pub mod video_repo;

pub use analysis_repo::AnalysisRepo;
pub use stats_repo::StatsRepo;
pub use video_repo::VideoRepo;

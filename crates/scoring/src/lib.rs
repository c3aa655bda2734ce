//! Bridge to the external scoring processor.
//!
//! `client` is the synchronous request/response HTTP client used by the
//! analysis orchestrator; `supervisor` owns the lifecycle of a locally
//! spawned processor instance.

pub mod client;
pub mod supervisor;

pub use client::{ScoringClient, ScoringError, ScoringResult};
pub use supervisor::{ProcessorState, ProcessorSupervisor};

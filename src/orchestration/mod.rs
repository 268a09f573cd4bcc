//! # Orchestration
//!
//! The submission saga: ordered pipeline execution, write-through progress
//! persistence, and the operator-triggered retry entry point.

pub mod orchestrator;
pub mod types;

pub use orchestrator::SubmissionOrchestrator;
pub use types::{OrchestrationError, StepName, SubmissionResult};

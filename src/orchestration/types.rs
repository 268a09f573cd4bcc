//! # Orchestration Types
//!
//! Shared types for the submission pipeline: step names, the result shape
//! returned to collaborators (intake UI, admin UI), and the orchestration
//! error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::constants::steps;
use crate::error::IntakeError;
use crate::state_machine::{StateMachineError, SubmissionState};
use crate::store::StoreError;

/// The saga's named steps, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    /// Folder provisioning and attachment uploads.
    DriveFolder,
    /// Tracker task creation and annotation.
    TaskCreate,
}

impl StepName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DriveFolder => steps::DRIVE_FOLDER,
            Self::TaskCreate => steps::TASK_CREATE,
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result returned to collaborators after `run` or `retry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub submission_id: Uuid,
    pub status: SubmissionState,
    pub task_url: Option<String>,
    pub folder_url: Option<String>,
}

/// Errors surfaced by the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    /// A pipeline step failed against its external service. The record has
    /// been marked `error` and a failure notification fired.
    #[error("step {step} failed for submission {submission_id}: {message}")]
    StepFailed {
        submission_id: Uuid,
        step: StepName,
        message: String,
    },

    /// The store itself failed. When this happens during record creation no
    /// partial record exists.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("submission {0} not found")]
    NotFound(Uuid),

    /// Retry called on a record that is not in a retryable state.
    #[error("submission {submission_id} is not retryable: {reason}")]
    RetryRejected {
        submission_id: Uuid,
        reason: String,
    },

    #[error(transparent)]
    InvalidTransition(#[from] StateMachineError),

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

/// Collapse orchestration failures into the root error for collaborators
/// that surface a single error type.
impl From<OrchestrationError> for IntakeError {
    fn from(err: OrchestrationError) -> Self {
        match err {
            OrchestrationError::Store(store_error) => store_error.into(),
            OrchestrationError::NotFound(id) => IntakeError::NotFound(format!("submission {id}")),
            OrchestrationError::InvalidTransition(transition) => {
                IntakeError::StateTransitionError(transition.to_string())
            }
            other => IntakeError::OrchestrationError(other.to_string()),
        }
    }
}

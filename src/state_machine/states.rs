use serde::{Deserialize, Serialize};
use std::fmt;

/// Submission lifecycle states.
///
/// A separate `draft` status exists in the intake UI's auto-save mechanism;
/// it never reaches this pipeline and is deliberately not represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    /// Saga is executing (or re-executing after a retry call).
    Processing,
    /// Every mandatory step produced output.
    Complete,
    /// A step failed; waiting for an operator-triggered retry.
    Error,
}

impl SubmissionState {
    /// Check if this is a terminal state (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Check if this is an error state that allows operator recovery.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Check if this is an active state (saga is being processed).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Processing)
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processing => write!(f, "processing"),
            Self::Complete => write!(f, "complete"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for SubmissionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(Self::Processing),
            "complete" => Ok(Self::Complete),
            "error" => Ok(Self::Error),
            _ => Err(format!("Invalid submission state: {s}")),
        }
    }
}

/// New submissions always start out processing.
impl Default for SubmissionState {
    fn default() -> Self {
        Self::Processing
    }
}

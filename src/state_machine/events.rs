use serde::{Deserialize, Serialize};

/// Events that drive submission state transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionEvent {
    /// Every mandatory step produced output.
    Complete,
    /// A step failed; carries the failing step name.
    Fail(String),
    /// Operator requested a retry of an errored submission.
    Retry,
}

//! # Submission State Machine
//!
//! Lifecycle management for submissions: `processing → {complete | error}`,
//! with `error → processing` reachable only through an explicit retry event.
//! There is no automatic transition out of `error` and no maximum-retry
//! cutoff; retries are unbounded and operator-driven.
//!
//! The transition function is pure; persistence of the resulting state is the
//! orchestrator's job, which writes through the store before proceeding.

pub mod events;
pub mod states;

pub use events::SubmissionEvent;
pub use states::SubmissionState;

/// Errors raised by transition validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateMachineError {
    #[error("Invalid transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },
}

pub type StateMachineResult<T> = Result<T, StateMachineError>;

/// Determine the target state for an event, rejecting anything outside the
/// forward-only lifecycle.
pub fn next_state(
    current: SubmissionState,
    event: &SubmissionEvent,
) -> StateMachineResult<SubmissionState> {
    let target = match (current, event) {
        (SubmissionState::Processing, SubmissionEvent::Complete) => SubmissionState::Complete,
        (SubmissionState::Processing, SubmissionEvent::Fail(_)) => SubmissionState::Error,
        (SubmissionState::Error, SubmissionEvent::Retry) => SubmissionState::Processing,

        (from, event) => {
            return Err(StateMachineError::InvalidTransition {
                from: from.to_string(),
                event: format!("{event:?}"),
            })
        }
    };

    Ok(target)
}

//! # State Store
//!
//! Durable access layer for [`Submission`] records, keyed by submission id.
//!
//! The write path is deliberately narrow: instead of a generic
//! `update(id, partial)`, each mutation the state machine allows gets its own
//! typed method, so an illegal partial write has no representation. Every
//! write bumps `last_modified`.
//!
//! Two implementations ship with the crate: [`PgSubmissionStore`] backed by
//! PostgreSQL, and [`InMemorySubmissionStore`] for tests and local tooling.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::IntakeError;
use crate::models::{ErrorDetail, FolderOutput, NewSubmission, Submission, TaskOutput};

pub mod memory;
pub mod migrations;
pub mod postgres;

pub use memory::InMemorySubmissionStore;
pub use migrations::DatabaseMigrations;
pub use postgres::PgSubmissionStore;

/// Errors from the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("submission {0} not found")]
    NotFound(Uuid),
    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: Uuid, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for IntakeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => IntakeError::NotFound(format!("submission {id}")),
            other => IntakeError::DatabaseError(other.to_string()),
        }
    }
}

/// Durable record of submission lifecycles.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist a new submission in `processing` status and return the record.
    async fn create(&self, new_submission: NewSubmission) -> StoreResult<Submission>;

    /// Load a submission by id.
    async fn get(&self, submission_id: Uuid) -> StoreResult<Option<Submission>>;

    /// Record the folder step's output.
    async fn set_folder_output(
        &self,
        submission_id: Uuid,
        output: &FolderOutput,
    ) -> StoreResult<()>;

    /// Record the task step's output.
    async fn set_task_output(&self, submission_id: Uuid, output: &TaskOutput) -> StoreResult<()>;

    /// Transition to `error` with failure detail.
    async fn mark_error(&self, submission_id: Uuid, detail: &ErrorDetail) -> StoreResult<()>;

    /// Transition back to `processing` for a retry, persisting the detail
    /// with its incremented retry counter before any step re-runs.
    async fn mark_retrying(&self, submission_id: Uuid, detail: &ErrorDetail) -> StoreResult<()>;

    /// Transition to `complete`: set the completion timestamp and clear any
    /// error detail.
    async fn mark_complete(
        &self,
        submission_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<()>;
}

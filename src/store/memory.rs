//! # In-Memory Store
//!
//! HashMap-backed [`SubmissionStore`] for integration tests and local
//! tooling. Mirrors the PostgreSQL implementation's semantics, including
//! `last_modified` bumps on every write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::{StoreError, StoreResult, SubmissionStore};
use crate::models::{
    ErrorDetail, FolderOutput, NewSubmission, StepOutputs, Submission, TaskOutput,
};
use crate::state_machine::SubmissionState;

/// In-memory submission store.
#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    records: RwLock<HashMap<Uuid, Submission>>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held. Test helper.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn mutate<F>(&self, submission_id: Uuid, apply: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Submission),
    {
        let mut records = self.records.write();
        let record = records
            .get_mut(&submission_id)
            .ok_or(StoreError::NotFound(submission_id))?;
        apply(record);
        record.last_modified = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn create(&self, new_submission: NewSubmission) -> StoreResult<Submission> {
        let now = Utc::now();
        let submission = Submission {
            submission_id: Uuid::new_v4(),
            payload: new_submission.payload,
            status: SubmissionState::default(),
            outputs: StepOutputs::default(),
            error_detail: None,
            created_at: now,
            completed_at: None,
            last_modified: now,
        };
        self.records
            .write()
            .insert(submission.submission_id, submission.clone());
        Ok(submission)
    }

    async fn get(&self, submission_id: Uuid) -> StoreResult<Option<Submission>> {
        Ok(self.records.read().get(&submission_id).cloned())
    }

    async fn set_folder_output(
        &self,
        submission_id: Uuid,
        output: &FolderOutput,
    ) -> StoreResult<()> {
        self.mutate(submission_id, |record| {
            record.outputs.folder = Some(output.clone());
        })
    }

    async fn set_task_output(&self, submission_id: Uuid, output: &TaskOutput) -> StoreResult<()> {
        self.mutate(submission_id, |record| {
            record.outputs.task = Some(output.clone());
        })
    }

    async fn mark_error(&self, submission_id: Uuid, detail: &ErrorDetail) -> StoreResult<()> {
        self.mutate(submission_id, |record| {
            record.status = SubmissionState::Error;
            record.error_detail = Some(detail.clone());
        })
    }

    async fn mark_retrying(&self, submission_id: Uuid, detail: &ErrorDetail) -> StoreResult<()> {
        self.mutate(submission_id, |record| {
            record.status = SubmissionState::Processing;
            record.error_detail = Some(detail.clone());
        })
    }

    async fn mark_complete(
        &self,
        submission_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.mutate(submission_id, |record| {
            record.status = SubmissionState::Complete;
            record.error_detail = None;
            record.completed_at = Some(completed_at);
        })
    }
}

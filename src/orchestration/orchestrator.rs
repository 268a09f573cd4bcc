//! # Submission Orchestrator
//!
//! Drives one submission through the ordered saga steps, writing progress
//! through the state store before proceeding past each step, and exposes the
//! resumable retry entry point.
//!
//! ## Pipeline
//!
//! `run` persists a new record in `processing`, then executes the step list
//! in fixed order: folder provisioning, task creation. Each step's output is
//! persisted before the next step starts. On step failure the record is
//! marked `error` with the failing step's detail, a failure alert fires, and
//! the error returns to the caller without attempting further steps. Record
//! creation failing is fatal and reported directly, with no partial record.
//!
//! `retry` re-enters the same pipeline: it requires an `error` record with
//! failure detail, increments the retry counter, transitions the record back
//! to `processing`, and re-executes from the first step with no recorded
//! output. Resumption relies on each step's own idempotency (found-or-created
//! intermediate folders) rather than fine-grained markers.
//!
//! The orchestrator holds no state across step boundaries beyond the current
//! execution; everything durable lives in the store.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use super::types::{OrchestrationError, StepName, SubmissionResult};
use crate::constants::events;
use crate::events::EventPublisher;
use crate::models::{ErrorDetail, NewSubmission, Submission, SubmissionPayload};
use crate::notifier::Notifier;
use crate::provisioner::FolderProvisioner;
use crate::state_machine::{self, SubmissionEvent, SubmissionState};
use crate::store::{StoreError, SubmissionStore};
use crate::tracker::TaskCreator;

/// Steps in execution order. Retry walks the same list and skips any step
/// that already has recorded output.
const PIPELINE_STEPS: &[StepName] = &[StepName::DriveFolder, StepName::TaskCreate];

/// How one step invocation ended.
enum StepFailure {
    /// The external service call failed; becomes an `error` record.
    Integration(String),
    /// The store write failed; propagates as a database error.
    Store(StoreError),
}

/// Composes the store, the two saga steps, and the notifier into the
/// submission pipeline.
pub struct SubmissionOrchestrator {
    store: Arc<dyn SubmissionStore>,
    provisioner: FolderProvisioner,
    task_creator: TaskCreator,
    notifier: Notifier,
    events: EventPublisher,
}

impl SubmissionOrchestrator {
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        provisioner: FolderProvisioner,
        task_creator: TaskCreator,
        notifier: Notifier,
    ) -> Self {
        Self::with_event_publisher(
            store,
            provisioner,
            task_creator,
            notifier,
            EventPublisher::default(),
        )
    }

    pub fn with_event_publisher(
        store: Arc<dyn SubmissionStore>,
        provisioner: FolderProvisioner,
        task_creator: TaskCreator,
        notifier: Notifier,
        events: EventPublisher,
    ) -> Self {
        Self {
            store,
            provisioner,
            task_creator,
            notifier,
            events,
        }
    }

    /// Lifecycle event stream for observers.
    pub fn event_publisher(&self) -> &EventPublisher {
        &self.events
    }

    /// Run the pipeline for a freshly validated payload.
    pub async fn run(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmissionResult, OrchestrationError> {
        let submission = self.store.create(NewSubmission { payload }).await?;
        let _ = self.events.publish(
            events::SUBMISSION_STARTED,
            json!({
                "submission_id": submission.submission_id,
                "client": submission.payload.client_name,
            }),
        );
        info!(submission_id = %submission.submission_id, "submission accepted");

        self.execute_pipeline(submission).await
    }

    /// Re-run an errored submission from the first step with no recorded
    /// output. Rejected as a no-op unless the record is in `error` status
    /// with failure detail.
    pub async fn retry(
        &self,
        submission_id: Uuid,
    ) -> Result<SubmissionResult, OrchestrationError> {
        let mut submission = self
            .store
            .get(submission_id)
            .await?
            .ok_or(OrchestrationError::NotFound(submission_id))?;

        if !submission.status.is_error() {
            return Err(OrchestrationError::RetryRejected {
                submission_id,
                reason: format!("status is {}", submission.status),
            });
        }
        let Some(previous_detail) = submission.error_detail.take() else {
            return Err(OrchestrationError::RetryRejected {
                submission_id,
                reason: "record has no error detail".to_string(),
            });
        };

        let next = state_machine::next_state(submission.status, &SubmissionEvent::Retry)?;

        // The incremented counter is persisted before any step re-runs, so a
        // second failure carries the honest attempt count.
        let detail = ErrorDetail {
            retry_count: previous_detail.retry_count + 1,
            ..previous_detail
        };
        self.store.mark_retrying(submission_id, &detail).await?;
        submission.status = next;
        submission.error_detail = Some(detail.clone());

        let _ = self.events.publish(
            events::SUBMISSION_RETRY_REQUESTED,
            json!({
                "submission_id": submission_id,
                "retry_count": detail.retry_count,
                "failed_step": detail.step,
            }),
        );
        info!(%submission_id, retry_count = detail.retry_count, "retry requested");

        self.execute_pipeline(submission).await
    }

    /// Read path for status display; not part of the write path.
    pub async fn get(
        &self,
        submission_id: Uuid,
    ) -> Result<Option<Submission>, OrchestrationError> {
        Ok(self.store.get(submission_id).await?)
    }

    /// Walk the step list, skipping steps with recorded output, then
    /// finalize the record.
    async fn execute_pipeline(
        &self,
        mut submission: Submission,
    ) -> Result<SubmissionResult, OrchestrationError> {
        for &step in PIPELINE_STEPS {
            if Self::has_output(&submission, step) {
                continue;
            }
            match self.run_step(&mut submission, step).await {
                Ok(()) => {
                    let _ = self.events.publish(
                        events::STEP_COMPLETED,
                        json!({
                            "submission_id": submission.submission_id,
                            "step": step.as_str(),
                        }),
                    );
                }
                Err(StepFailure::Integration(message)) => {
                    return self.fail_step(&submission, step, message).await;
                }
                Err(StepFailure::Store(store_error)) => {
                    return Err(store_error.into());
                }
            }
        }

        self.finalize(submission).await
    }

    fn has_output(submission: &Submission, step: StepName) -> bool {
        match step {
            StepName::DriveFolder => submission.outputs.folder.is_some(),
            StepName::TaskCreate => submission.outputs.task.is_some(),
        }
    }

    /// Execute one step and write its output through the store.
    async fn run_step(
        &self,
        submission: &mut Submission,
        step: StepName,
    ) -> Result<(), StepFailure> {
        match step {
            StepName::DriveFolder => {
                let output = self
                    .provisioner
                    .provision(&submission.payload, submission.created_at.date_naive())
                    .await
                    .map_err(|e| StepFailure::Integration(e.to_string()))?;
                self.store
                    .set_folder_output(submission.submission_id, &output)
                    .await
                    .map_err(StepFailure::Store)?;
                submission.outputs.folder = Some(output);
            }
            StepName::TaskCreate => {
                let folder = submission.outputs.folder.as_ref().ok_or_else(|| {
                    StepFailure::Integration("folder output missing before task step".to_string())
                })?;
                let output = self
                    .task_creator
                    .create_task(
                        &submission.payload,
                        &folder.folder_url,
                        &folder.uploaded_files,
                    )
                    .await
                    .map_err(|e| StepFailure::Integration(e.to_string()))?;
                self.store
                    .set_task_output(submission.submission_id, &output)
                    .await
                    .map_err(StepFailure::Store)?;
                submission.outputs.task = Some(output);
            }
        }
        Ok(())
    }

    /// Mark the record complete and fire the success alert.
    async fn finalize(
        &self,
        submission: Submission,
    ) -> Result<SubmissionResult, OrchestrationError> {
        let submission_id = submission.submission_id;
        state_machine::next_state(submission.status, &SubmissionEvent::Complete)?;

        let (Some(folder), Some(task)) = (&submission.outputs.folder, &submission.outputs.task)
        else {
            return Err(OrchestrationError::Internal(format!(
                "submission {submission_id} finalized without mandatory step outputs"
            )));
        };

        let completed_at = Utc::now();
        self.store.mark_complete(submission_id, completed_at).await?;
        let _ = self.events.publish(
            events::SUBMISSION_COMPLETED,
            json!({ "submission_id": submission_id }),
        );
        info!(%submission_id, task_url = %task.task_url, "submission provisioned");

        self.notifier
            .notify_success(&submission.payload, &task.task_url, &folder.folder_url)
            .await;

        Ok(SubmissionResult {
            submission_id,
            status: SubmissionState::Complete,
            task_url: Some(task.task_url.clone()),
            folder_url: Some(folder.folder_url.clone()),
        })
    }

    /// Persist the failure, alert the channel, and short-circuit the saga.
    async fn fail_step(
        &self,
        submission: &Submission,
        step: StepName,
        message: String,
    ) -> Result<SubmissionResult, OrchestrationError> {
        let submission_id = submission.submission_id;
        state_machine::next_state(submission.status, &SubmissionEvent::Fail(step.as_str().into()))?;

        // A first failure starts at zero; a failed retry keeps the counter
        // the retry call already incremented.
        let retry_count = submission
            .error_detail
            .as_ref()
            .map(|detail| detail.retry_count)
            .unwrap_or(0);
        let detail = ErrorDetail {
            step: step.as_str().to_string(),
            failed_at: Utc::now(),
            retry_count,
            last_error: message.clone(),
        };
        self.store.mark_error(submission_id, &detail).await?;

        let _ = self.events.publish(
            events::STEP_FAILED,
            json!({ "submission_id": submission_id, "step": step.as_str() }),
        );
        let _ = self.events.publish(
            events::SUBMISSION_FAILED,
            json!({
                "submission_id": submission_id,
                "step": step.as_str(),
                "retry_count": retry_count,
            }),
        );
        error!(%submission_id, step = step.as_str(), %message, "pipeline step failed");

        self.notifier
            .notify_failure(step.as_str(), &submission.payload, &message, submission_id)
            .await;

        Err(OrchestrationError::StepFailed {
            submission_id,
            step,
            message,
        })
    }
}

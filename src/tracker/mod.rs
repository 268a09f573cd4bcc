//! # Task Creator
//!
//! Creates the task-tracker record for a submission: a templated rich
//! description, static custom-field mapping, and a link back to the
//! provisioned folder.
//!
//! Task creation is all-or-nothing: any failure aborts the step and
//! propagates to the orchestrator. After successful creation two best-effort
//! side effects run and never fail the step: each uploaded file is attached
//! as an external link, and collaborator emails are recorded as a comment
//! (the tracker API has no follower-by-email primitive, so a comment is the
//! deliberate fallback).

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::TrackerConfig;
use crate::models::{SubmissionPayload, TaskOutput, UploadedFile};
use crate::services::{NewTrackerTask, ServiceResult, TaskService};

pub mod description;
pub mod fields;

pub use description::BriefTemplate;

/// Creates and annotates tracker tasks for submissions.
pub struct TaskCreator {
    tasks: Arc<dyn TaskService>,
    config: TrackerConfig,
}

impl TaskCreator {
    pub fn new(tasks: Arc<dyn TaskService>, config: TrackerConfig) -> Self {
        Self { tasks, config }
    }

    fn task_title(payload: &SubmissionPayload) -> String {
        format!("[{}] {}", payload.client_name.trim(), payload.title.trim())
    }

    /// Create the tracker task for a submission.
    pub async fn create_task(
        &self,
        payload: &SubmissionPayload,
        folder_url: &str,
        uploaded_files: &[UploadedFile],
    ) -> ServiceResult<TaskOutput> {
        let new_task = NewTrackerTask {
            title: Self::task_title(payload),
            description_html: description::build_description(payload, folder_url),
            project_id: self.config.project_id.clone(),
            due_date: payload.due_date,
            custom_fields: fields::custom_fields(payload),
        };

        let task = self.tasks.create_task(&new_task).await?;
        info!(task_id = %task.id, client = %payload.client_name, "created tracker task");

        self.attach_uploaded_files(&task.id, uploaded_files).await;
        self.record_collaborators(&task.id, payload).await;

        Ok(TaskOutput {
            task_id: task.id,
            task_url: task.url,
        })
    }

    /// Attach each uploaded file as an external link. Best-effort.
    async fn attach_uploaded_files(&self, task_id: &str, uploaded_files: &[UploadedFile]) {
        for file in uploaded_files {
            if let Err(error) = self
                .tasks
                .attach_external_link(task_id, &file.file_url, &file.file_name)
                .await
            {
                warn!(task_id, file = %file.file_name, %error, "file link attachment failed");
            }
        }
    }

    /// Record collaborator emails as a comment. Best-effort.
    async fn record_collaborators(&self, task_id: &str, payload: &SubmissionPayload) {
        if payload.collaborator_emails.is_empty() {
            return;
        }
        let text = format!("Collaborators: {}", payload.collaborator_emails.join(", "));
        if let Err(error) = self.tasks.add_comment(task_id, &text).await {
            warn!(task_id, %error, "collaborator comment failed");
        }
    }
}

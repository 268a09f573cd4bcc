//! # Submission Model
//!
//! Durable record of one submission's trip through the provisioning saga.
//!
//! ## Overview
//!
//! Each `Submission` captures the payload snapshot, the accumulated per-step
//! outputs, the current lifecycle status, and, when a step has failed, the
//! error detail an operator needs for triage and retry. The record transitions
//! forward only: `processing → {complete | error}`, with `error → processing`
//! reachable solely through an explicit retry call.
//!
//! ## Database Mapping
//!
//! Maps to the `intake_submissions` table:
//! - `submission_id`: primary key (UUID)
//! - `payload`: JSONB payload snapshot
//! - `status`: lifecycle status (TEXT)
//! - `outputs`: JSONB accumulated step outputs
//! - `error_detail`: JSONB, null unless a step has failed
//! - `created_at`, `completed_at`, `last_modified`: TIMESTAMPTZ

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state_machine::SubmissionState;

/// One user-initiated request and its accumulated processing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub submission_id: Uuid,
    pub payload: super::SubmissionPayload,
    pub status: SubmissionState,
    pub outputs: StepOutputs,
    pub error_detail: Option<ErrorDetail>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_modified: DateTime<Utc>,
}

/// New submission for creation (without generated fields). Status is always
/// `processing` at creation; there is no way to create a record in any other
/// state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubmission {
    pub payload: super::SubmissionPayload,
}

/// Accumulated results of the saga steps. A missing entry means the step has
/// not produced output yet; retry uses this to decide where to resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepOutputs {
    #[serde(default)]
    pub folder: Option<FolderOutput>,
    #[serde(default)]
    pub task: Option<TaskOutput>,
}

impl StepOutputs {
    /// True when every mandatory step has recorded output.
    pub fn all_mandatory_present(&self) -> bool {
        self.folder.is_some() && self.task.is_some()
    }
}

/// Output of the folder provisioning step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderOutput {
    pub folder_id: String,
    pub folder_url: String,
    /// Files that actually uploaded; may be a subset of the payload's
    /// attachments because per-file upload failure is non-fatal.
    pub uploaded_files: Vec<UploadedFile>,
}

/// One successfully uploaded attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file_id: String,
    pub file_name: String,
    pub file_url: String,
}

/// Output of the task creation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub task_id: String,
    pub task_url: String,
}

/// Failure context persisted when a step fails. Present iff the submission is
/// in `error` status (it is retained, with an incremented counter, while a
/// retry is re-processing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Name of the single failing step (`drive_folder` or `task_create`).
    pub step: String,
    pub failed_at: DateTime<Utc>,
    /// Number of retry invocations so far. 0 on first failure; incremented by
    /// exactly one per retry call; never reset except by clearing the whole
    /// detail on success.
    pub retry_count: u32,
    pub last_error: String,
}

impl Submission {
    /// Whether a retry call would be accepted for this record.
    pub fn is_retryable(&self) -> bool {
        self.status.is_error() && self.error_detail.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_outputs_mandatory_check() {
        let mut outputs = StepOutputs::default();
        assert!(!outputs.all_mandatory_present());

        outputs.folder = Some(FolderOutput {
            folder_id: "f1".to_string(),
            folder_url: "https://storage/f1".to_string(),
            uploaded_files: vec![],
        });
        assert!(!outputs.all_mandatory_present());

        outputs.task = Some(TaskOutput {
            task_id: "t1".to_string(),
            task_url: "https://tracker/t1".to_string(),
        });
        assert!(outputs.all_mandatory_present());
    }

    #[test]
    fn test_outputs_deserialize_from_empty_object() {
        let outputs: StepOutputs = serde_json::from_str("{}").unwrap();
        assert!(outputs.folder.is_none());
        assert!(outputs.task.is_none());
    }
}

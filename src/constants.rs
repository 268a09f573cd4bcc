//! # System Constants
//!
//! Core constants that define the operational boundaries of the intake
//! provisioning pipeline: lifecycle event names, saga step names, and the
//! fixed folder layout provisioned for every submission.

/// Lifecycle events published on the in-process event channel as submissions
/// move through the pipeline.
pub mod events {
    // Submission lifecycle events
    pub const SUBMISSION_STARTED: &str = "submission.started";
    pub const SUBMISSION_COMPLETED: &str = "submission.completed";
    pub const SUBMISSION_FAILED: &str = "submission.failed";
    pub const SUBMISSION_RETRY_REQUESTED: &str = "submission.retry_requested";

    // Step lifecycle events
    pub const STEP_COMPLETED: &str = "step.completed";
    pub const STEP_FAILED: &str = "step.failed";
}

/// Saga step identifiers, persisted into `error_detail.step` and surfaced in
/// failure notifications. These are wire-stable names; renaming one changes
/// what operators see in the admin surface.
pub mod steps {
    pub const DRIVE_FOLDER: &str = "drive_folder";
    pub const TASK_CREATE: &str = "task_create";
}

/// Folder layout provisioned under every submission's leaf folder.
pub mod folders {
    /// Subfolders created fresh under each request leaf folder, in order.
    pub const LEAF_SUBFOLDERS: &[&str] = &["Brief", "Assets", "Deliverables"];

    /// Subfolder that receives attachment uploads.
    pub const UPLOAD_SUBFOLDER: &str = "Assets";

    /// Bucket folder name for client names that do not start with an
    /// alphabetic character.
    pub const FALLBACK_BUCKET: &str = "#";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_subfolder_is_provisioned() {
        assert!(folders::LEAF_SUBFOLDERS.contains(&folders::UPLOAD_SUBFOLDER));
    }
}

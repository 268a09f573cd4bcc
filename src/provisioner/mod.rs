//! # Folder Provisioner
//!
//! Builds or reuses the deterministic folder hierarchy for a submission and
//! uploads its attachments.
//!
//! ## Hierarchy
//!
//! ```text
//! <partition root>/<first-letter bucket>/<client name>/<calendar year>/
//!     <date - title>/            (leaf, always created fresh)
//!         Brief/
//!         Assets/                (receives attachment uploads)
//!         Deliverables/
//! ```
//!
//! Every intermediate level is found-or-created: an existing folder with the
//! exact name is reused, so concurrent or repeated submissions for the same
//! client and year never produce duplicate intermediate folders. The leaf is
//! never looked up: a retried submission gets a fresh leaf folder and a full
//! re-upload, and any half-populated leaf from the failed attempt is left
//! behind (accepted limitation of the retry design).
//!
//! Per-file upload failure is non-fatal: the file is logged and skipped, and
//! the step succeeds with the subset that uploaded. Collaborator permission
//! grants on the leaf are equally best-effort.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::constants::folders;
use crate::models::{FolderOutput, SubmissionPayload, UploadedFile};
use crate::services::{FolderRef, FolderService, PermissionRole, ServiceResult};

/// Provisions the folder hierarchy and uploads attachments for one submission.
pub struct FolderProvisioner {
    folders: Arc<dyn FolderService>,
    config: StorageConfig,
}

/// First character of the client name, uppercased, when alphabetic.
fn bucket_letter(client_name: &str) -> Option<char> {
    client_name
        .trim()
        .chars()
        .next()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
}

/// Name of the first-letter bucket folder.
fn bucket_name(client_name: &str) -> String {
    match bucket_letter(client_name) {
        Some(letter) => letter.to_string(),
        None => folders::FALLBACK_BUCKET.to_string(),
    }
}

impl FolderProvisioner {
    pub fn new(folders: Arc<dyn FolderService>, config: StorageConfig) -> Self {
        Self { folders, config }
    }

    /// Storage partition for a client: A-M (and anything not starting with a
    /// letter) lives under the primary root, N-Z under the secondary.
    fn partition_root(&self, client_name: &str) -> &str {
        match bucket_letter(client_name) {
            Some(letter) if letter >= 'N' => &self.config.secondary_root_folder_id,
            _ => &self.config.primary_root_folder_id,
        }
    }

    /// Name of the per-request leaf folder.
    fn leaf_name(payload: &SubmissionPayload, submitted_on: NaiveDate) -> String {
        format!("{} - {}", submitted_on.format("%Y-%m-%d"), payload.title.trim())
    }

    /// Reuse an existing child folder with this exact name, or create it.
    async fn find_or_create(&self, name: &str, parent_id: &str) -> ServiceResult<FolderRef> {
        if let Some(existing) = self.folders.find_folder(name, parent_id).await? {
            debug!(folder = name, parent = parent_id, "reusing existing folder");
            return Ok(existing);
        }
        let created = self.folders.create_folder(name, parent_id).await?;
        debug!(folder = name, parent = parent_id, id = %created.id, "created folder");
        Ok(created)
    }

    /// Build the hierarchy for a submission and upload its attachments.
    ///
    /// `submitted_on` is the submission's creation date, so a retry lands in
    /// the same calendar-year folder as the original attempt.
    pub async fn provision(
        &self,
        payload: &SubmissionPayload,
        submitted_on: NaiveDate,
    ) -> ServiceResult<FolderOutput> {
        let client_name = payload.client_name.trim();
        let root_id = self.partition_root(client_name).to_string();

        // Intermediate levels are found-or-created; this is the idempotency
        // guarantee that makes retry safe.
        let bucket = self.find_or_create(&bucket_name(client_name), &root_id).await?;
        let client = self.find_or_create(client_name, &bucket.id).await?;
        let year = self
            .find_or_create(&submitted_on.format("%Y").to_string(), &client.id)
            .await?;

        // The leaf is always created fresh, never looked up.
        let leaf = self
            .folders
            .create_folder(&Self::leaf_name(payload, submitted_on), &year.id)
            .await?;

        let mut upload_parent = leaf.id.clone();
        for subfolder in folders::LEAF_SUBFOLDERS {
            let created = self.folders.create_folder(subfolder, &leaf.id).await?;
            if *subfolder == folders::UPLOAD_SUBFOLDER {
                upload_parent = created.id;
            }
        }

        let uploaded_files = self.upload_attachments(payload, &upload_parent).await;
        self.grant_collaborator_access(payload, &leaf.id).await;

        info!(
            client = client_name,
            folder_id = %leaf.id,
            uploaded = uploaded_files.len(),
            attachments = payload.attachments.len(),
            "provisioned submission folder"
        );

        Ok(FolderOutput {
            folder_id: leaf.id,
            folder_url: leaf.url,
            uploaded_files,
        })
    }

    /// Upload each attachment individually. Per-file failure is logged and
    /// skipped; the returned list holds only the files that made it.
    async fn upload_attachments(
        &self,
        payload: &SubmissionPayload,
        parent_id: &str,
    ) -> Vec<UploadedFile> {
        let mut uploaded = Vec::with_capacity(payload.attachments.len());
        for attachment in &payload.attachments {
            match self
                .folders
                .upload_file(&attachment.file_name, &attachment.content, parent_id)
                .await
            {
                Ok(file) => uploaded.push(UploadedFile {
                    file_id: file.id,
                    file_name: file.name,
                    file_url: file.url,
                }),
                Err(error) => {
                    warn!(
                        file = %attachment.file_name,
                        %error,
                        "attachment upload failed, skipping file"
                    );
                }
            }
        }
        uploaded
    }

    /// Grant collaborators write access on the leaf folder. Best-effort.
    async fn grant_collaborator_access(&self, payload: &SubmissionPayload, folder_id: &str) {
        for email in &payload.collaborator_emails {
            if let Err(error) = self
                .folders
                .set_permission(folder_id, email, PermissionRole::Writer)
                .await
            {
                warn!(%email, %error, "collaborator permission grant failed");
            }
        }
    }
}

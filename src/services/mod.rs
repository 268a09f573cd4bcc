//! # External Service Interfaces
//!
//! Trait seams for the three independently-failing collaborators the saga
//! drives: the file-storage service, the task tracker, and the messaging
//! channel. The orchestrator and its steps only ever see these traits;
//! concrete clients are constructed explicitly and injected, which is what
//! lets the integration tests substitute recording fakes.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub mod http;

pub use http::{HttpFolderService, HttpNotificationService, HttpTaskService};

/// Errors from any external service call.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{service} returned {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("unexpected response from {service}: {reason}")]
    Decode {
        service: &'static str,
        reason: String,
    },
    /// Used by test fakes to simulate outages.
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        service: &'static str,
        reason: String,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A folder in the storage hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRef {
    pub id: String,
    pub url: String,
}

/// An uploaded file in the storage hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// A record in the task tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: String,
    pub url: String,
}

/// Access level granted on a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionRole {
    Reader,
    Writer,
}

impl PermissionRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reader => "reader",
            Self::Writer => "writer",
        }
    }
}

/// Task creation request for the tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTrackerTask {
    pub title: String,
    pub description_html: String,
    pub project_id: String,
    pub due_date: Option<NaiveDate>,
    /// Tracker custom field id → option/value identifier. Fields the payload
    /// has no lookup entry for are simply absent.
    pub custom_fields: HashMap<String, String>,
}

/// Cloud file-storage hierarchy operations.
#[async_trait]
pub trait FolderService: Send + Sync {
    /// Look up an existing child folder with this exact name under a parent.
    async fn find_folder(&self, name: &str, parent_id: &str) -> ServiceResult<Option<FolderRef>>;

    /// Create a child folder under a parent.
    async fn create_folder(&self, name: &str, parent_id: &str) -> ServiceResult<FolderRef>;

    /// Upload one file into a folder.
    async fn upload_file(
        &self,
        name: &str,
        content: &[u8],
        parent_id: &str,
    ) -> ServiceResult<FileRef>;

    /// Grant an email address access to a folder.
    async fn set_permission(
        &self,
        folder_id: &str,
        email: &str,
        role: PermissionRole,
    ) -> ServiceResult<()>;
}

/// Task-tracker operations.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn create_task(&self, task: &NewTrackerTask) -> ServiceResult<TaskRef>;

    async fn add_comment(&self, task_id: &str, text: &str) -> ServiceResult<()>;

    async fn attach_external_link(
        &self,
        task_id: &str,
        url: &str,
        name: &str,
    ) -> ServiceResult<()>;
}

/// Messaging-channel delivery. Callers ignore delivery status beyond logging.
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn post_message(&self, channel: &str, blocks: &[Value]) -> ServiceResult<()>;
}

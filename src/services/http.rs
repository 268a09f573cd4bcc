//! # HTTP Service Adapters
//!
//! Bearer-token REST clients for the folder, task, and notification services.
//! Each adapter deserializes only the subset of remote fields this pipeline
//! cares about; anything else the services return is ignored.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    FileRef, FolderRef, FolderService, NewTrackerTask, NotificationService, PermissionRole,
    ServiceError, ServiceResult, TaskRef, TaskService,
};
use crate::config::{NotificationConfig, StorageConfig, TrackerConfig};

/// Read an error body and map a non-success response to `ServiceError::Api`.
async fn check(
    service: &'static str,
    response: reqwest::Response,
) -> ServiceResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Api {
        service,
        status: status.as_u16(),
        body,
    })
}

/// File-storage service client.
#[derive(Debug, Clone)]
pub struct HttpFolderService {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct RemoteFolder {
    id: String,
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct FolderListResponse {
    folders: Vec<RemoteFolder>,
}

#[derive(Debug, Deserialize)]
struct RemoteFile {
    id: String,
    name: String,
    url: String,
}

impl HttpFolderService {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl FolderService for HttpFolderService {
    async fn find_folder(&self, name: &str, parent_id: &str) -> ServiceResult<Option<FolderRef>> {
        let response = self
            .client
            .get(format!("{}/folders", self.base_url))
            .bearer_auth(&self.token)
            .query(&[("parent_id", parent_id), ("name", name)])
            .send()
            .await?;
        let listing: FolderListResponse = check("storage", response).await?.json().await?;

        // The service matches names case-sensitively but may return siblings;
        // only an exact name match counts as found.
        Ok(listing
            .folders
            .into_iter()
            .find(|folder| folder.name == name)
            .map(|folder| FolderRef {
                id: folder.id,
                url: folder.url,
            }))
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> ServiceResult<FolderRef> {
        let response = self
            .client
            .post(format!("{}/folders", self.base_url))
            .bearer_auth(&self.token)
            .json(&json!({ "name": name, "parent_id": parent_id }))
            .send()
            .await?;
        let folder: RemoteFolder = check("storage", response).await?.json().await?;
        Ok(FolderRef {
            id: folder.id,
            url: folder.url,
        })
    }

    async fn upload_file(
        &self,
        name: &str,
        content: &[u8],
        parent_id: &str,
    ) -> ServiceResult<FileRef> {
        let response = self
            .client
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&self.token)
            .query(&[("parent_id", parent_id), ("name", name)])
            .body(content.to_vec())
            .send()
            .await?;
        let file: RemoteFile = check("storage", response).await?.json().await?;
        Ok(FileRef {
            id: file.id,
            name: file.name,
            url: file.url,
        })
    }

    async fn set_permission(
        &self,
        folder_id: &str,
        email: &str,
        role: PermissionRole,
    ) -> ServiceResult<()> {
        let response = self
            .client
            .post(format!("{}/folders/{}/permissions", self.base_url, folder_id))
            .bearer_auth(&self.token)
            .json(&json!({ "email": email, "role": role.as_str() }))
            .send()
            .await?;
        check("storage", response).await?;
        Ok(())
    }
}

/// Task-tracker service client.
#[derive(Debug, Clone)]
pub struct HttpTaskService {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct RemoteTask {
    id: String,
    url: String,
}

impl HttpTaskService {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl TaskService for HttpTaskService {
    async fn create_task(&self, task: &NewTrackerTask) -> ServiceResult<TaskRef> {
        let response = self
            .client
            .post(format!("{}/tasks", self.base_url))
            .bearer_auth(&self.token)
            .json(task)
            .send()
            .await?;
        let created: RemoteTask = check("tracker", response).await?.json().await?;
        Ok(TaskRef {
            id: created.id,
            url: created.url,
        })
    }

    async fn add_comment(&self, task_id: &str, text: &str) -> ServiceResult<()> {
        let response = self
            .client
            .post(format!("{}/tasks/{}/comments", self.base_url, task_id))
            .bearer_auth(&self.token)
            .json(&json!({ "text": text }))
            .send()
            .await?;
        check("tracker", response).await?;
        Ok(())
    }

    async fn attach_external_link(
        &self,
        task_id: &str,
        url: &str,
        name: &str,
    ) -> ServiceResult<()> {
        let response = self
            .client
            .post(format!("{}/tasks/{}/attachments", self.base_url, task_id))
            .bearer_auth(&self.token)
            .json(&json!({ "url": url, "name": name, "type": "external" }))
            .send()
            .await?;
        check("tracker", response).await?;
        Ok(())
    }
}

/// Messaging-channel client.
#[derive(Debug, Clone)]
pub struct HttpNotificationService {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpNotificationService {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl NotificationService for HttpNotificationService {
    async fn post_message(&self, channel: &str, blocks: &[Value]) -> ServiceResult<()> {
        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .bearer_auth(&self.token)
            .json(&json!({ "channel": channel, "blocks": blocks }))
            .send()
            .await?;
        check("messaging", response).await?;
        Ok(())
    }
}

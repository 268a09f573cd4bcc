//! Shared test infrastructure: recording fakes for the three external
//! services, a payload builder, and a harness wiring an orchestrator over the
//! in-memory store.

#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use intake_core::config::IntakeConfig;
use intake_core::models::{
    Attachment, BillingInfo, ProductLine, ReferenceLink, Region, RequestCategory,
    SubmissionPayload, Submitter, ValueBracket,
};
use intake_core::notifier::Notifier;
use intake_core::orchestration::SubmissionOrchestrator;
use intake_core::provisioner::FolderProvisioner;
use intake_core::services::{
    FileRef, FolderRef, FolderService, NewTrackerTask, NotificationService, PermissionRole,
    ServiceError, ServiceResult, TaskRef, TaskService,
};
use intake_core::store::InMemorySubmissionStore;
use intake_core::tracker::TaskCreator;

// ---------------------------------------------------------------------------
// Fake folder service

#[derive(Debug, Clone)]
pub struct FakeFolder {
    pub id: String,
    pub name: String,
    pub parent_id: String,
}

#[derive(Debug, Clone)]
pub struct FakeUpload {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub size: usize,
}

/// In-memory stand-in for the file-storage service. Records every operation
/// and can be told to fail folder creation or individual uploads.
#[derive(Default)]
pub struct FakeFolderService {
    folders: Mutex<Vec<FakeFolder>>,
    files: Mutex<Vec<FakeUpload>>,
    permissions: Mutex<Vec<(String, String, String)>>,
    next_id: AtomicU64,
    fail_folder_creation: AtomicBool,
    fail_permissions: AtomicBool,
    failing_uploads: Mutex<HashSet<String>>,
}

impl FakeFolderService {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        format!("{prefix}-{n}")
    }

    fn url_for(id: &str) -> String {
        format!("https://storage.test/{id}")
    }

    /// Toggle an induced fault on every subsequent folder creation.
    pub fn fail_folder_creation(&self, on: bool) {
        self.fail_folder_creation.store(on, Ordering::SeqCst);
    }

    pub fn fail_permissions(&self, on: bool) {
        self.fail_permissions.store(on, Ordering::SeqCst);
    }

    /// Make uploads of this file name fail.
    pub fn fail_upload_for(&self, file_name: &str) {
        self.failing_uploads.lock().insert(file_name.to_string());
    }

    pub fn folder_count_named(&self, name: &str) -> usize {
        self.folders.lock().iter().filter(|f| f.name == name).count()
    }

    pub fn folders_under(&self, parent_id: &str) -> Vec<String> {
        self.folders
            .lock()
            .iter()
            .filter(|f| f.parent_id == parent_id)
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn total_folders_created(&self) -> usize {
        self.folders.lock().len()
    }

    pub fn folder_name(&self, id: &str) -> Option<String> {
        self.folders
            .lock()
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.name.clone())
    }

    pub fn folder_parent(&self, id: &str) -> Option<String> {
        self.folders
            .lock()
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.parent_id.clone())
    }

    pub fn uploads(&self) -> Vec<FakeUpload> {
        self.files.lock().clone()
    }

    pub fn granted_permissions(&self) -> Vec<(String, String, String)> {
        self.permissions.lock().clone()
    }

    /// Seed an existing folder, as if a previous submission created it.
    pub fn seed_folder(&self, name: &str, parent_id: &str) -> String {
        let id = self.next("seeded");
        self.folders.lock().push(FakeFolder {
            id: id.clone(),
            name: name.to_string(),
            parent_id: parent_id.to_string(),
        });
        id
    }
}

#[async_trait]
impl FolderService for FakeFolderService {
    async fn find_folder(&self, name: &str, parent_id: &str) -> ServiceResult<Option<FolderRef>> {
        Ok(self
            .folders
            .lock()
            .iter()
            .find(|f| f.name == name && f.parent_id == parent_id)
            .map(|f| FolderRef {
                id: f.id.clone(),
                url: Self::url_for(&f.id),
            }))
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> ServiceResult<FolderRef> {
        if self.fail_folder_creation.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable {
                service: "storage",
                reason: "induced folder fault".to_string(),
            });
        }
        let id = self.next("folder");
        self.folders.lock().push(FakeFolder {
            id: id.clone(),
            name: name.to_string(),
            parent_id: parent_id.to_string(),
        });
        Ok(FolderRef {
            url: Self::url_for(&id),
            id,
        })
    }

    async fn upload_file(
        &self,
        name: &str,
        content: &[u8],
        parent_id: &str,
    ) -> ServiceResult<FileRef> {
        if self.failing_uploads.lock().contains(name) {
            return Err(ServiceError::Unavailable {
                service: "storage",
                reason: format!("induced upload fault for {name}"),
            });
        }
        let id = self.next("file");
        self.files.lock().push(FakeUpload {
            id: id.clone(),
            name: name.to_string(),
            parent_id: parent_id.to_string(),
            size: content.len(),
        });
        Ok(FileRef {
            url: Self::url_for(&id),
            name: name.to_string(),
            id,
        })
    }

    async fn set_permission(
        &self,
        folder_id: &str,
        email: &str,
        role: PermissionRole,
    ) -> ServiceResult<()> {
        if self.fail_permissions.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable {
                service: "storage",
                reason: "induced permission fault".to_string(),
            });
        }
        self.permissions.lock().push((
            folder_id.to_string(),
            email.to_string(),
            role.as_str().to_string(),
        ));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fake task service

#[derive(Debug, Clone)]
pub struct CreatedTask {
    pub id: String,
    pub task: NewTrackerTask,
}

/// In-memory stand-in for the task tracker.
#[derive(Default)]
pub struct FakeTaskService {
    tasks: Mutex<Vec<CreatedTask>>,
    comments: Mutex<Vec<(String, String)>>,
    links: Mutex<Vec<(String, String, String)>>,
    next_id: AtomicU64,
    fail_task_creation: AtomicBool,
    fail_annotations: AtomicBool,
}

impl FakeTaskService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_task_creation(&self, on: bool) {
        self.fail_task_creation.store(on, Ordering::SeqCst);
    }

    /// Make the best-effort annotation calls (links, comments) fail.
    pub fn fail_annotations(&self, on: bool) {
        self.fail_annotations.store(on, Ordering::SeqCst);
    }

    pub fn created_tasks(&self) -> Vec<CreatedTask> {
        self.tasks.lock().clone()
    }

    pub fn comments(&self) -> Vec<(String, String)> {
        self.comments.lock().clone()
    }

    pub fn attached_links(&self) -> Vec<(String, String, String)> {
        self.links.lock().clone()
    }
}

#[async_trait]
impl TaskService for FakeTaskService {
    async fn create_task(&self, task: &NewTrackerTask) -> ServiceResult<TaskRef> {
        if self.fail_task_creation.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable {
                service: "tracker",
                reason: "induced task fault".to_string(),
            });
        }
        let id = format!("task-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.tasks.lock().push(CreatedTask {
            id: id.clone(),
            task: task.clone(),
        });
        Ok(TaskRef {
            url: format!("https://tracker.test/{id}"),
            id,
        })
    }

    async fn add_comment(&self, task_id: &str, text: &str) -> ServiceResult<()> {
        if self.fail_annotations.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable {
                service: "tracker",
                reason: "induced comment fault".to_string(),
            });
        }
        self.comments
            .lock()
            .push((task_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn attach_external_link(
        &self,
        task_id: &str,
        url: &str,
        name: &str,
    ) -> ServiceResult<()> {
        if self.fail_annotations.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable {
                service: "tracker",
                reason: "induced link fault".to_string(),
            });
        }
        self.links
            .lock()
            .push((task_id.to_string(), url.to_string(), name.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fake notification service

#[derive(Debug, Clone)]
pub struct PostedMessage {
    pub channel: String,
    pub blocks: Vec<Value>,
}

impl PostedMessage {
    pub fn rendered(&self) -> String {
        serde_json::to_string(&self.blocks).expect("blocks serialize")
    }
}

/// Records every posted message; can simulate a dead channel.
#[derive(Default)]
pub struct FakeNotificationService {
    messages: Mutex<Vec<PostedMessage>>,
    fail_delivery: AtomicBool,
}

impl FakeNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_delivery(&self, on: bool) {
        self.fail_delivery.store(on, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<PostedMessage> {
        self.messages.lock().clone()
    }

    pub fn messages_to(&self, channel: &str) -> Vec<PostedMessage> {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.channel == channel)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NotificationService for FakeNotificationService {
    async fn post_message(&self, channel: &str, blocks: &[Value]) -> ServiceResult<()> {
        if self.fail_delivery.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable {
                service: "messaging",
                reason: "induced delivery fault".to_string(),
            });
        }
        self.messages.lock().push(PostedMessage {
            channel: channel.to_string(),
            blocks: blocks.to_vec(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Payload builder

/// Builder pattern for test payloads.
pub struct PayloadBuilder {
    payload: SubmissionPayload,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self {
            payload: SubmissionPayload {
                client_name: "Acme".to_string(),
                title: "Spring launch".to_string(),
                category: RequestCategory::Campaign,
                due_date: None,
                submitter: Submitter {
                    name: "Jo Field".to_string(),
                    email: "jo@acme.example".to_string(),
                },
                collaborator_emails: vec![],
                notes: None,
                billing: BillingInfo {
                    billable: true,
                    region: Region::Emea,
                    value_bracket: ValueBracket::TenToFiftyK,
                },
                products: vec![],
                links: vec![],
                attachments: vec![],
            },
        }
    }

    pub fn with_client(mut self, name: &str) -> Self {
        self.payload.client_name = name.to_string();
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.payload.title = title.to_string();
        self
    }

    pub fn with_category(mut self, category: RequestCategory) -> Self {
        self.payload.category = category;
        self
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.payload.due_date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.payload.notes = Some(notes.to_string());
        self
    }

    pub fn with_collaborator(mut self, email: &str) -> Self {
        self.payload.collaborator_emails.push(email.to_string());
        self
    }

    pub fn with_attachment(mut self, file_name: &str, content: &[u8]) -> Self {
        self.payload.attachments.push(Attachment {
            file_name: file_name.to_string(),
            mime_type: "application/octet-stream".to_string(),
            content: content.to_vec(),
        });
        self
    }

    pub fn with_product(mut self, name: &str, quantity: u32) -> Self {
        self.payload.products.push(ProductLine {
            name: name.to_string(),
            sku: None,
            quantity,
            notes: None,
        });
        self
    }

    pub fn with_link(mut self, label: &str, url: &str) -> Self {
        self.payload.links.push(ReferenceLink {
            label: label.to_string(),
            url: url.to_string(),
        });
        self
    }

    pub fn build(self) -> SubmissionPayload {
        self.payload
    }
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Harness

pub const SUCCESS_CHANNEL: &str = "#intake-wins";

/// Orchestrator over the in-memory store and recording fakes.
pub struct TestHarness {
    pub store: Arc<InMemorySubmissionStore>,
    pub folders: Arc<FakeFolderService>,
    pub tasks: Arc<FakeTaskService>,
    pub notifications: Arc<FakeNotificationService>,
    pub config: IntakeConfig,
    pub orchestrator: SubmissionOrchestrator,
}

impl TestHarness {
    pub fn new() -> Self {
        let mut config = IntakeConfig::default();
        config.notifications.success_channel = Some(SUCCESS_CHANNEL.to_string());

        let store = Arc::new(InMemorySubmissionStore::new());
        let folders = Arc::new(FakeFolderService::new());
        let tasks = Arc::new(FakeTaskService::new());
        let notifications = Arc::new(FakeNotificationService::new());

        let orchestrator = SubmissionOrchestrator::new(
            store.clone(),
            FolderProvisioner::new(folders.clone(), config.storage.clone()),
            TaskCreator::new(tasks.clone(), config.tracker.clone()),
            Notifier::new(notifications.clone(), config.notifications.clone()),
        );

        Self {
            store,
            folders,
            tasks,
            notifications,
            config,
            orchestrator,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

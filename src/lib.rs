#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections

//! # Intake Core
//!
//! Rust core of the client request intake system: takes one validated
//! submission payload and provisions it across three independent external
//! services (a cloud file-storage hierarchy, a task tracker, and a durable
//! status record), with failure alerts to a messaging channel.
//!
//! ## Architecture
//!
//! The heart of the crate is the **submission saga**: an ordered pipeline of
//! side-effecting steps against services that fail independently and share no
//! transaction boundary. Progress is written through the state store after
//! every step, so a failed submission can be retried by an operator and
//! resumes from the first step with no recorded output. Semantics are
//! at-least-once, idempotent where possible: intermediate folders are
//! found-or-created, the per-request leaf folder is always fresh.
//!
//! ## Module Organization
//!
//! - [`models`] - Submission record and validated payload snapshot
//! - [`store`] - State store trait with PostgreSQL and in-memory backends
//! - [`state_machine`] - Submission lifecycle states and transitions
//! - [`orchestration`] - The saga pipeline and retry entry point
//! - [`provisioner`] - Idempotent folder hierarchy and attachment uploads
//! - [`tracker`] - Task creation, brief templating, custom-field mapping
//! - [`notifier`] - Fire-and-forget failure/success alerts
//! - [`services`] - External service traits and HTTP adapters
//! - [`validation`] - Payload shape rules applied before orchestration
//! - [`events`] - In-process lifecycle event publisher
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use intake_core::config::IntakeConfig;
//! use intake_core::notifier::Notifier;
//! use intake_core::orchestration::SubmissionOrchestrator;
//! use intake_core::provisioner::FolderProvisioner;
//! use intake_core::services::{HttpFolderService, HttpNotificationService, HttpTaskService};
//! use intake_core::store::PgSubmissionStore;
//! use intake_core::tracker::TaskCreator;
//!
//! # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//! let config = IntakeConfig::from_env()?;
//! config.validate()?;
//!
//! let orchestrator = SubmissionOrchestrator::new(
//!     Arc::new(PgSubmissionStore::new(pool)),
//!     FolderProvisioner::new(
//!         Arc::new(HttpFolderService::new(&config.storage)),
//!         config.storage.clone(),
//!     ),
//!     TaskCreator::new(
//!         Arc::new(HttpTaskService::new(&config.tracker)),
//!         config.tracker.clone(),
//!     ),
//!     Notifier::new(
//!         Arc::new(HttpNotificationService::new(&config.notifications)),
//!         config.notifications.clone(),
//!     ),
//! );
//! # let payload = todo!();
//! intake_core::validation::validate_payload(&payload)?;
//! let result = orchestrator.run(payload).await?;
//! println!("submission {} is {}", result.submission_id, result.status);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod notifier;
pub mod orchestration;
pub mod provisioner;
pub mod services;
pub mod state_machine;
pub mod store;
pub mod tracker;
pub mod validation;

pub use config::IntakeConfig;
pub use error::{IntakeError, Result};
pub use models::{NewSubmission, Submission, SubmissionPayload};
pub use orchestration::{OrchestrationError, StepName, SubmissionOrchestrator, SubmissionResult};
// Re-export the state enum under the name collaborators use for the column
pub use state_machine::SubmissionState as SubmissionStatus;
pub use store::{InMemorySubmissionStore, PgSubmissionStore, SubmissionStore};

//! # Lifecycle Events
//!
//! In-process publisher for submission lifecycle events. Subscribing is
//! optional; publishing to nobody succeeds. Event names live in
//! [`crate::constants::events`].

pub mod publisher;

pub use publisher::{EventPublisher, PublishError, PublishedEvent};

//! # Notifier
//!
//! Posts structured failure/success alerts to the messaging channel. Both
//! directions are fire-and-forget: transport failures are logged locally and
//! never raised to the caller, so a broken alerting channel can never fail or
//! block the saga itself.

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::config::NotificationConfig;
use crate::models::SubmissionPayload;
use crate::services::NotificationService;

/// Failure/success alerting for the pipeline.
pub struct Notifier {
    service: Arc<dyn NotificationService>,
    config: NotificationConfig,
}

impl Notifier {
    pub fn new(service: Arc<dyn NotificationService>, config: NotificationConfig) -> Self {
        Self { service, config }
    }

    fn summary_fields(payload: &SubmissionPayload) -> Value {
        json!({
            "type": "section",
            "fields": [
                { "type": "mrkdwn", "text": format!("*Category:* {}", payload.category) },
                { "type": "mrkdwn", "text": format!("*Client:* {}", payload.client_name) },
                { "type": "mrkdwn", "text": format!("*Title:* {}", payload.title) },
                { "type": "mrkdwn", "text": format!("*Submitted by:* {}", payload.submitter.email) },
            ]
        })
    }

    fn failure_blocks(
        &self,
        step: &str,
        payload: &SubmissionPayload,
        error: &str,
        submission_id: Uuid,
    ) -> Vec<Value> {
        let admin_link = format!("{}/{}", self.config.admin_base_url, submission_id);
        vec![
            json!({
                "type": "header",
                "text": { "type": "plain_text", "text": "Intake provisioning failed" }
            }),
            json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": format!("*Failing step:* `{step}`") }
            }),
            Self::summary_fields(payload),
            json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": format!("```{error}```") }
            }),
            json!({
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!("<{admin_link}|Open record for retry>")
                }
            }),
        ]
    }

    fn success_blocks(payload: &SubmissionPayload, task_url: &str, folder_url: &str) -> Vec<Value> {
        vec![
            json!({
                "type": "header",
                "text": { "type": "plain_text", "text": "Intake request provisioned" }
            }),
            Self::summary_fields(payload),
            json!({
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!("<{task_url}|Task> | <{folder_url}|Folder>")
                }
            }),
        ]
    }

    /// Alert the failure channel about a failed step.
    pub async fn notify_failure(
        &self,
        step: &str,
        payload: &SubmissionPayload,
        error: &str,
        submission_id: Uuid,
    ) {
        let blocks = self.failure_blocks(step, payload, error, submission_id);
        if let Err(delivery_error) = self
            .service
            .post_message(&self.config.failure_channel, &blocks)
            .await
        {
            warn!(%submission_id, step, %delivery_error, "failure notification not delivered");
        }
    }

    /// Announce a completed submission. Skipped unless a success channel is
    /// configured.
    pub async fn notify_success(
        &self,
        payload: &SubmissionPayload,
        task_url: &str,
        folder_url: &str,
    ) {
        let Some(channel) = &self.config.success_channel else {
            return;
        };
        let blocks = Self::success_blocks(payload, task_url, folder_url);
        if let Err(delivery_error) = self.service.post_message(channel, &blocks).await {
            warn!(client = %payload.client_name, %delivery_error, "success notification not delivered");
        }
    }
}

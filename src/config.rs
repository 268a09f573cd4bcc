use crate::error::{IntakeError, Result};

/// Top-level configuration for the intake pipeline.
///
/// Construction is explicit: build one (usually via [`IntakeConfig::from_env`])
/// and hand it to the components that need it. Nothing in this crate reads
/// configuration lazily from globals.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub database_url: String,
    pub storage: StorageConfig,
    pub tracker: TrackerConfig,
    pub notifications: NotificationConfig,
}

/// File-storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub api_base_url: String,
    pub api_token: String,
    /// Root folder of the primary partition (client names A-M and any name
    /// not starting with a letter).
    pub primary_root_folder_id: String,
    /// Root folder of the secondary partition (client names N-Z).
    pub secondary_root_folder_id: String,
}

/// Task-tracker service configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub api_base_url: String,
    pub api_token: String,
    /// Project that receives every intake task.
    pub project_id: String,
}

/// Messaging-channel configuration for failure/success alerts.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub api_base_url: String,
    pub api_token: String,
    pub failure_channel: String,
    /// Success alerts are only sent when a channel is configured.
    pub success_channel: Option<String>,
    /// Base URL for deep links into the admin record view, used in failure
    /// alerts so operators can reach the retry button directly.
    pub admin_base_url: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://localhost/intake_development".to_string(),
            storage: StorageConfig {
                api_base_url: "https://storage.internal/api/v3".to_string(),
                api_token: String::new(),
                primary_root_folder_id: "root-clients-a-m".to_string(),
                secondary_root_folder_id: "root-clients-n-z".to_string(),
            },
            tracker: TrackerConfig {
                api_base_url: "https://tracker.internal/api/1".to_string(),
                api_token: String::new(),
                project_id: "intake-requests".to_string(),
            },
            notifications: NotificationConfig {
                api_base_url: "https://chat.internal/api".to_string(),
                api_token: String::new(),
                failure_channel: "#intake-alerts".to_string(),
                success_channel: None,
                admin_base_url: "https://intake.internal/admin/submissions".to_string(),
            },
        }
    }
}

impl IntakeConfig {
    /// Build configuration from the environment, falling back to defaults for
    /// anything unset. Required secrets (API tokens) are validated separately
    /// by [`IntakeConfig::validate`] so local tooling can construct a config
    /// without them.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            config.database_url = db_url;
        }

        if let Ok(url) = std::env::var("INTAKE_STORAGE_API_URL") {
            config.storage.api_base_url = url;
        }
        if let Ok(token) = std::env::var("INTAKE_STORAGE_API_TOKEN") {
            config.storage.api_token = token;
        }
        if let Ok(id) = std::env::var("INTAKE_STORAGE_PRIMARY_ROOT") {
            config.storage.primary_root_folder_id = id;
        }
        if let Ok(id) = std::env::var("INTAKE_STORAGE_SECONDARY_ROOT") {
            config.storage.secondary_root_folder_id = id;
        }

        if let Ok(url) = std::env::var("INTAKE_TRACKER_API_URL") {
            config.tracker.api_base_url = url;
        }
        if let Ok(token) = std::env::var("INTAKE_TRACKER_API_TOKEN") {
            config.tracker.api_token = token;
        }
        if let Ok(project) = std::env::var("INTAKE_TRACKER_PROJECT_ID") {
            config.tracker.project_id = project;
        }

        if let Ok(url) = std::env::var("INTAKE_NOTIFY_API_URL") {
            config.notifications.api_base_url = url;
        }
        if let Ok(token) = std::env::var("INTAKE_NOTIFY_API_TOKEN") {
            config.notifications.api_token = token;
        }
        if let Ok(channel) = std::env::var("INTAKE_NOTIFY_FAILURE_CHANNEL") {
            config.notifications.failure_channel = channel;
        }
        match std::env::var("INTAKE_NOTIFY_SUCCESS_CHANNEL") {
            Ok(channel) if !channel.is_empty() => {
                config.notifications.success_channel = Some(channel);
            }
            _ => {}
        }
        if let Ok(url) = std::env::var("INTAKE_ADMIN_BASE_URL") {
            config.notifications.admin_base_url = url;
        }

        Ok(config)
    }

    /// Check that everything a production deployment needs is present.
    pub fn validate(&self) -> Result<()> {
        if self.database_url.is_empty() {
            return Err(IntakeError::ConfigurationError(
                "database_url must not be empty".to_string(),
            ));
        }
        if self.storage.api_token.is_empty() {
            return Err(IntakeError::ConfigurationError(
                "storage api_token must not be empty".to_string(),
            ));
        }
        if self.tracker.api_token.is_empty() {
            return Err(IntakeError::ConfigurationError(
                "tracker api_token must not be empty".to_string(),
            ));
        }
        if self.notifications.api_token.is_empty() {
            return Err(IntakeError::ConfigurationError(
                "notification api_token must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_both_partitions() {
        let config = IntakeConfig::default();
        assert_ne!(
            config.storage.primary_root_folder_id,
            config.storage.secondary_root_folder_id
        );
        assert!(config.notifications.success_channel.is_none());
    }

    #[test]
    fn test_validate_rejects_missing_tokens() {
        let config = IntakeConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, IntakeError::ConfigurationError(_)));
    }
}

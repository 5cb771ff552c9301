use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// `views.open` rejects modal titles over 24 characters.
pub const MAX_TITLE_CHARS: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_submit_label")]
    pub submit_label: String,
    #[serde(default = "default_close_label")]
    pub close_label: String,
    /// Callback id of the global shortcut that opens the composer.
    #[serde(default = "default_shortcut_callback_id")]
    pub shortcut_callback_id: String,
}

fn default_title() -> String {
    "BT Comms App".into()
}

fn default_submit_label() -> String {
    "Submit".into()
}

fn default_close_label() -> String {
    "Cancel".into()
}

fn default_shortcut_callback_id() -> String {
    "bt_comms_shortcut".into()
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            submit_label: default_submit_label(),
            close_label: default_close_label(),
            shortcut_callback_id: default_shortcut_callback_id(),
        }
    }
}

impl ModalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let title_len = self.title.chars().count();
        if title_len == 0 || title_len > MAX_TITLE_CHARS {
            return Err(ConfigError::Validation(format!(
                "modal.title must be 1-{MAX_TITLE_CHARS} characters, got {title_len}"
            )));
        }
        for (field, value) in [
            ("modal.submit_label", &self.submit_label),
            ("modal.close_label", &self.close_label),
            ("modal.shortcut_callback_id", &self.shortcut_callback_id),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastConfig {
    /// Fallback `text` for messages whose body flattens to nothing.
    #[serde(default = "default_notification_text")]
    pub notification_text: String,
    /// Upper bound on concurrent `chat.postMessage` calls per submission.
    #[serde(default = "default_max_concurrent_sends")]
    pub max_concurrent_sends: usize,
}

fn default_notification_text() -> String {
    "Message from Slack Communications App".into()
}

fn default_max_concurrent_sends() -> usize {
    4
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            notification_text: default_notification_text(),
            max_concurrent_sends: default_max_concurrent_sends(),
        }
    }
}

impl BroadcastConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_sends == 0 {
            return Err(ConfigError::Validation(
                "broadcast.max_concurrent_sends must be at least 1".into(),
            ));
        }
        if self.notification_text.trim().is_empty() {
            return Err(ConfigError::Validation(
                "broadcast.notification_text must not be empty".into(),
            ));
        }
        Ok(())
    }
}

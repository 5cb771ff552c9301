use thiserror::Error;

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Form snapshot errors ───────────────────────────────────────────────────

/// A section or control that must be present in the view state is missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("block {block_id} missing from view state")]
    MissingBlock { block_id: String },

    #[error("control {action_id} missing from block {block_id}")]
    MissingControl { block_id: String, action_id: String },
}

// ─── Slack Web API errors ───────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SlackApiError {
    #[error("{method} request failed: {source}")]
    Http {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} failed ({status}): {body}")]
    Status {
        method: &'static str,
        status: u16,
        body: String,
    },

    #[error("{method} rejected by Slack: {error}")]
    Api { method: &'static str, error: String },

    /// `views.update` was called with a hash that no longer matches the view.
    #[error("{method} rejected: view hash is stale")]
    HashConflict { method: &'static str },

    #[error("{method} returned an unreadable response: {message}")]
    Decode {
        method: &'static str,
        message: String,
    },
}

impl SlackApiError {
    pub fn is_hash_conflict(&self) -> bool {
        matches!(self, Self::HashConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = ConfigError::Validation("bad token".into());
        assert!(err.to_string().contains("validation failed"));
    }

    #[test]
    fn config_error_converts_into_anyhow() {
        let err: anyhow::Error = ConfigError::Validation("modal.title too long".into()).into();
        assert!(err.downcast_ref::<ConfigError>().is_some());
        assert!(err.to_string().contains("modal.title"));
    }

    #[test]
    fn missing_control_names_block_and_action() {
        let err = FormError::MissingControl {
            block_id: "sender_name".into(),
            action_id: "plain_text_input-action".into(),
        };
        let text = err.to_string();
        assert!(text.contains("sender_name"));
        assert!(text.contains("plain_text_input-action"));
    }

    #[test]
    fn hash_conflict_is_detectable() {
        let err = SlackApiError::HashConflict {
            method: "views.update",
        };
        assert!(err.is_hash_conflict());
        assert!(err.to_string().contains("stale"));

        let other = SlackApiError::Api {
            method: "views.update",
            error: "not_found".into(),
        };
        assert!(!other.is_hash_conflict());
    }
}

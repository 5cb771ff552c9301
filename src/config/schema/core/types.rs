use super::super::{BroadcastConfig, ModalConfig, ObservabilityConfig, SlackConfig};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub slack: SlackConfig,

    #[serde(default)]
    pub modal: ModalConfig,

    #[serde(default)]
    pub broadcast: BroadcastConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub reliability: ReliabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    /// First delay before reconnecting a dropped Socket Mode session.
    #[serde(default = "default_socket_backoff_secs")]
    pub socket_initial_backoff_secs: u64,
    /// Ceiling for the doubling reconnect delay.
    #[serde(default = "default_socket_backoff_max_secs")]
    pub socket_max_backoff_secs: u64,
}

fn default_socket_backoff_secs() -> u64 {
    2
}

fn default_socket_backoff_max_secs() -> u64 {
    60
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            socket_initial_backoff_secs: default_socket_backoff_secs(),
            socket_max_backoff_secs: default_socket_backoff_max_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let commsbot_dir = home.join(".commsbot");

        Self {
            config_path: commsbot_dir.join("config.toml"),
            slack: SlackConfig::default(),
            modal: ModalConfig::default(),
            broadcast: BroadcastConfig::default(),
            observability: ObservabilityConfig::default(),
            reliability: ReliabilityConfig::default(),
        }
    }
}

impl Config {
    /// Checks everything that does not need Slack credentials. Token checks
    /// live in [`SlackConfig::validate_tokens`] so offline commands work
    /// without them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.slack.validate_api_base_url()?;
        self.modal.validate()?;
        self.broadcast.validate()?;

        let reliability = &self.reliability;
        if reliability.socket_initial_backoff_secs == 0 {
            return Err(ConfigError::Validation(
                "reliability.socket_initial_backoff_secs must be at least 1".into(),
            ));
        }
        if reliability.socket_max_backoff_secs < reliability.socket_initial_backoff_secs {
            return Err(ConfigError::Validation(
                "reliability.socket_max_backoff_secs must not be below the initial backoff"
                    .into(),
            ));
        }
        Ok(())
    }
}

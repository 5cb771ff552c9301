use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Bot user OAuth token (`xoxb-…`), used for every Web API call.
    #[serde(default)]
    pub bot_token: String,
    /// App-level token (`xapp-…`) with `connections:write`, used to open
    /// Socket Mode connections.
    #[serde(default)]
    pub app_token: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.into()
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            app_token: String::new(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl SlackConfig {
    /// Checks both tokens are present and of the expected kind.
    pub fn validate_tokens(&self) -> Result<(), ConfigError> {
        check_token("slack.bot_token", &self.bot_token, "xoxb-", "SLACK_BOT_TOKEN")?;
        check_token("slack.app_token", &self.app_token, "xapp-", "SLACK_APP_TOKEN")
    }

    pub fn validate_api_base_url(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.api_base_url).map_err(|e| {
            ConfigError::Validation(format!(
                "slack.api_base_url {:?} is not a URL: {e}",
                self.api_base_url
            ))
        })?;
        if matches!(parsed.scheme(), "http" | "https") {
            Ok(())
        } else {
            Err(ConfigError::Validation(format!(
                "slack.api_base_url must use http or https, got {}",
                parsed.scheme()
            )))
        }
    }
}

fn check_token(
    field: &str,
    token: &str,
    prefix: &str,
    env_var: &str,
) -> Result<(), ConfigError> {
    if token.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field} is not set (set it in config.toml or export {env_var})"
        )));
    }
    if !token.starts_with(prefix) {
        return Err(ConfigError::Validation(format!(
            "{field} must start with {prefix}"
        )));
    }
    Ok(())
}

use super::Config;
use crate::config::LogLevel;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("SLACK_BOT_TOKEN")
            && !token.is_empty()
        {
            self.slack.bot_token = token;
        }

        if let Ok(token) = std::env::var("SLACK_APP_TOKEN")
            && !token.is_empty()
        {
            self.slack.app_token = token;
        }

        if let Ok(base) = std::env::var("COMMSBOT_API_BASE")
            && !base.is_empty()
        {
            self.slack.api_base_url = base.trim_end_matches('/').to_string();
        }

        if let Ok(level_str) = std::env::var("COMMSBOT_LOG_LEVEL") {
            match level_str.parse::<LogLevel>() {
                Ok(level) => self.observability.log_level = level,
                Err(_) => tracing::warn!(value = %level_str, "ignoring unknown COMMSBOT_LOG_LEVEL"),
            }
        }
    }
}

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::blocks::{Block, ModalView};
use super::{ApiFuture, SlackApi};
use crate::config::SlackConfig;
use crate::error::SlackApiError;
use crate::form::submission::OutboundMessage;

/// Who the bot token belongs to, as reported by `auth.test`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthIdentity {
    pub user_id: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ViewEnvelope {
    view: ViewRef,
}

#[derive(Debug, Deserialize)]
struct ViewRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ts: String,
}

#[derive(Debug, Deserialize)]
struct ConnectionsOpenResponse {
    url: String,
}

/// `chat.postMessage` request body.
#[derive(Debug, serde::Serialize)]
struct ChatPostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_url: Option<&'a str>,
}

/// Slack Web API client over reqwest.
pub struct SlackClient {
    bot_token: String,
    app_token: String,
    base_url: String,
    http: reqwest::Client,
}

impl SlackClient {
    pub fn new(bot_token: &str, app_token: &str, base_url: &str) -> Self {
        Self {
            bot_token: bot_token.to_string(),
            app_token: app_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &SlackConfig) -> Self {
        Self::new(&config.bot_token, &config.app_token, &config.api_base_url)
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    /// POSTs `body` to a Web API method and decodes the success payload.
    ///
    /// Slack answers most application errors with HTTP 200 and `"ok": false`,
    /// so the `ok` field is checked before decoding.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        token: &str,
        body: Option<&Value>,
    ) -> Result<T, SlackApiError> {
        let mut request = self.http.post(self.method_url(method)).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request
            .send()
            .await
            .map_err(|source| SlackApiError::Http { method, source })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));

        if !status.is_success() {
            return Err(SlackApiError::Status {
                method,
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: Value = serde_json::from_str(&text).map_err(|e| SlackApiError::Decode {
            method,
            message: e.to_string(),
        })?;

        if parsed.get("ok") != Some(&Value::Bool(true)) {
            let error = parsed
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            if error == "hash_conflict" {
                return Err(SlackApiError::HashConflict { method });
            }
            return Err(SlackApiError::Api {
                method,
                error: error.to_string(),
            });
        }

        serde_json::from_value(parsed).map_err(|e| SlackApiError::Decode {
            method,
            message: e.to_string(),
        })
    }

    fn view_json(view: &ModalView, method: &'static str) -> Result<Value, SlackApiError> {
        serde_json::to_value(view).map_err(|e| SlackApiError::Decode {
            method,
            message: e.to_string(),
        })
    }
}

impl SlackApi for SlackClient {
    fn open_view<'a>(&'a self, trigger_id: &'a str, view: &'a ModalView) -> ApiFuture<'a, String> {
        Box::pin(async move {
            let body = json!({
                "trigger_id": trigger_id,
                "view": Self::view_json(view, "views.open")?,
            });
            let resp: ViewEnvelope = self
                .call("views.open", &self.bot_token, Some(&body))
                .await?;
            Ok(resp.view.id)
        })
    }

    fn update_view<'a>(
        &'a self,
        view_id: &'a str,
        hash: &'a str,
        view: &'a ModalView,
    ) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let body = json!({
                "view_id": view_id,
                "hash": hash,
                "view": Self::view_json(view, "views.update")?,
            });
            let _: ViewEnvelope = self
                .call("views.update", &self.bot_token, Some(&body))
                .await?;
            Ok(())
        })
    }

    fn push_view<'a>(&'a self, trigger_id: &'a str, view: &'a ModalView) -> ApiFuture<'a, String> {
        Box::pin(async move {
            let body = json!({
                "trigger_id": trigger_id,
                "view": Self::view_json(view, "views.push")?,
            });
            let resp: ViewEnvelope = self
                .call("views.push", &self.bot_token, Some(&body))
                .await?;
            Ok(resp.view.id)
        })
    }

    fn post_message<'a>(&'a self, message: &'a OutboundMessage) -> ApiFuture<'a, String> {
        Box::pin(async move {
            let payload = ChatPostMessage {
                channel: &message.channel,
                text: &message.text,
                blocks: message.rendered_blocks(),
                username: message.username.as_deref(),
                icon_url: message.icon_url.as_deref(),
            };
            let body = serde_json::to_value(&payload).map_err(|e| SlackApiError::Decode {
                method: "chat.postMessage",
                message: e.to_string(),
            })?;
            let resp: PostMessageResponse = self
                .call("chat.postMessage", &self.bot_token, Some(&body))
                .await?;
            Ok(resp.ts)
        })
    }

    fn auth_test(&self) -> ApiFuture<'_, AuthIdentity> {
        Box::pin(async move { self.call("auth.test", &self.bot_token, None).await })
    }

    fn open_socket_connection(&self) -> ApiFuture<'_, String> {
        Box::pin(async move {
            let resp: ConnectionsOpenResponse = self
                .call("apps.connections.open", &self.app_token, None)
                .await?;
            Ok(resp.url)
        })
    }
}

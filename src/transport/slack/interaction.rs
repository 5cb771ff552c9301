//! Socket Mode envelopes and the interactive payloads they carry.

use serde::Deserialize;
use serde_json::Value;

use crate::form::state::{ControlValue, FormState};

/// Frame received over the Socket Mode WebSocket.
///
/// `hello` and `disconnect` frames carry no `envelope_id`; everything else
/// must be acknowledged with it.
#[derive(Debug, Clone, Deserialize)]
pub struct SocketEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub envelope_id: Option<String>,
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SlackUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// View as echoed back on `block_actions`, `view_submission` and `view_closed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ViewPayload {
    pub id: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub callback_id: String,
    #[serde(default)]
    pub private_metadata: String,
    #[serde(default)]
    pub state: FormState,
}

/// The control that fired a `block_actions` payload, with its new value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlockAction {
    pub action_id: String,
    pub block_id: String,
    #[serde(default)]
    pub action_ts: Option<String>,
    #[serde(flatten)]
    pub control: ControlValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShortcutPayload {
    pub callback_id: String,
    pub trigger_id: String,
    #[serde(default)]
    pub user: SlackUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockActionsPayload {
    #[serde(default)]
    pub trigger_id: Option<String>,
    #[serde(default)]
    pub user: SlackUser,
    #[serde(default)]
    pub view: Option<ViewPayload>,
    #[serde(default)]
    pub actions: Vec<BlockAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewSubmissionPayload {
    #[serde(default)]
    pub user: SlackUser,
    pub view: ViewPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewClosedPayload {
    #[serde(default)]
    pub user: SlackUser,
    pub view: ViewPayload,
    #[serde(default)]
    pub is_cleared: bool,
}

/// Payload of an `interactive` envelope, keyed by its `type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionPayload {
    Shortcut(ShortcutPayload),
    BlockActions(BlockActionsPayload),
    ViewSubmission(ViewSubmissionPayload),
    ViewClosed(ViewClosedPayload),
    #[serde(other)]
    Unsupported,
}

impl InteractionPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Shortcut(_) => "shortcut",
            Self::BlockActions(_) => "block_actions",
            Self::ViewSubmission(_) => "view_submission",
            Self::ViewClosed(_) => "view_closed",
            Self::Unsupported => "unsupported",
        }
    }
}

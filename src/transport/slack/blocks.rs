//! Block Kit surface types.
//!
//! Only the block and element kinds the composer modal and the broadcast
//! messages use are modelled. Everything serializes to the exact JSON shape
//! `views.open`, `views.update` and `chat.postMessage` accept.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    PlainText,
    Mrkdwn,
}

/// Composition text object (`plain_text` or `mrkdwn`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: TextKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<bool>,
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::PlainText,
            text: text.into(),
            emoji: Some(true),
        }
    }

    /// Plain text without the `emoji` flag, as Slack expects for hints and placeholders.
    pub fn plain_bare(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::PlainText,
            text: text.into(),
            emoji: None,
        }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::Mrkdwn,
            text: text.into(),
            emoji: None,
        }
    }
}

/// Option object used by checkboxes and selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionObject {
    pub text: TextObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<TextObject>,
    pub value: String,
}

impl OptionObject {
    pub fn plain(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: TextObject::plain(text),
            description: None,
            value: value.into(),
        }
    }
}

/// Interactive element nested in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockElement {
    RichTextInput {
        action_id: String,
    },
    PlainTextInput {
        action_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<TextObject>,
    },
    MultiConversationsSelect {
        action_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<TextObject>,
    },
    Checkboxes {
        action_id: String,
        options: Vec<OptionObject>,
    },
    StaticSelect {
        action_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<TextObject>,
        options: Vec<OptionObject>,
    },
    Button {
        action_id: String,
        text: TextObject,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
}

/// A single layout block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Input {
        block_id: String,
        label: TextObject,
        element: BlockElement,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<TextObject>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        optional: bool,
    },
    Section {
        block_id: String,
        text: TextObject,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accessory: Option<BlockElement>,
    },
    Divider {
        block_id: String,
    },
    Actions {
        block_id: String,
        elements: Vec<BlockElement>,
    },
    Context {
        block_id: String,
        elements: Vec<TextObject>,
    },
    Header {
        block_id: String,
        text: TextObject,
    },
    /// Rich text document as produced by a `rich_text_input`. Nodes are kept
    /// opaque so that formatting survives the round trip to `chat.postMessage`.
    RichText {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        elements: Vec<serde_json::Value>,
    },
}

impl Block {
    pub fn block_id(&self) -> Option<&str> {
        match self {
            Self::Input { block_id, .. }
            | Self::Section { block_id, .. }
            | Self::Divider { block_id }
            | Self::Actions { block_id, .. }
            | Self::Context { block_id, .. }
            | Self::Header { block_id, .. } => Some(block_id),
            Self::RichText { block_id, .. } => block_id.as_deref(),
        }
    }

    pub fn divider(block_id: impl Into<String>) -> Self {
        Self::Divider {
            block_id: block_id.into(),
        }
    }
}

/// Modal surface passed to `views.open`, `views.update` and `views.push`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "modal")]
pub struct ModalView {
    pub callback_id: String,
    pub title: TextObject,
    pub submit: TextObject,
    pub close: TextObject,
    #[serde(default)]
    pub private_metadata: String,
    pub blocks: Vec<Block>,
}

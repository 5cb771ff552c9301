//! Turns a submitted composer view into one outbound message per recipient.

use std::collections::BTreeMap;

use thiserror::Error;
use url::Url;

use super::catalog::{
    self, CTA_INPUT_ACTION, CTA_LINK_BLOCK, CTA_TEXT_BLOCK, ICON_URL_ACTION, ICON_URL_BLOCK,
    MESSAGE_ACTION, MESSAGE_BLOCK, MESSAGE_BUTTON_ACTION, MESSAGE_BUTTON_BLOCK, RECIPIENTS_ACTION,
    RECIPIENTS_BLOCK, SENDER_NAME_ACTION, SENDER_NAME_BLOCK,
};
use super::interpreter::{CtaCount, CtaCountError, InterpretError, interpret};
use super::rich_text::{RichText, to_plain_text};
use super::state::FormState;
use crate::config::BroadcastConfig;
use crate::error::FormError;
use crate::transport::slack::blocks::{Block, BlockElement, TextObject};

/// Block Kit caps button text at 75 characters.
pub const MAX_BUTTON_TEXT_CHARS: usize = 75;

/// Per-input validation messages, keyed by block id.
pub type FieldErrors = BTreeMap<String, String>;

/// Link button attached below the message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtaButton {
    pub text: String,
    pub url: String,
}

impl CtaButton {
    /// `actions` block for button `index` (1-based): `button_id_{index}`
    /// holding a `button_action_{index}` link button.
    pub fn to_block(&self, index: u8) -> Block {
        Block::Actions {
            block_id: catalog::indexed_block_id(MESSAGE_BUTTON_BLOCK, index),
            elements: vec![BlockElement::Button {
                action_id: catalog::indexed_block_id(MESSAGE_BUTTON_ACTION, index),
                text: TextObject::plain(&self.text),
                url: Some(self.url.clone()),
                value: None,
            }],
        }
    }
}

/// One `chat.postMessage` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub channel: String,
    /// Notification fallback shown where blocks cannot be rendered.
    pub text: String,
    /// Message body.
    pub blocks: Vec<Block>,
    pub username: Option<String>,
    pub icon_url: Option<String>,
    pub cta_buttons: Vec<CtaButton>,
}

impl OutboundMessage {
    /// Body blocks followed by one `actions` block per CTA button.
    pub fn rendered_blocks(&self) -> Vec<Block> {
        let mut blocks = self.blocks.clone();
        blocks.extend(
            (1u8..)
                .zip(&self.cta_buttons)
                .map(|(index, button)| button.to_block(index)),
        );
        blocks
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// A section the submitted view must contain is missing.
    #[error("malformed submission: {0}")]
    Malformed(#[from] FormError),

    #[error("unreadable CTA count {raw:?}: {source}")]
    CtaCount {
        raw: String,
        #[source]
        source: CtaCountError,
    },

    /// User input the modal should reject inline.
    #[error("invalid submission: {} field error(s)", .0.len())]
    Invalid(FieldErrors),
}

impl SubmissionError {
    /// Errors Slack can show next to the offending inputs.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Malformed(_) | Self::CtaCount { .. } => None,
        }
    }
}

impl From<InterpretError> for SubmissionError {
    fn from(err: InterpretError) -> Self {
        let InterpretError::UnparseableCtaCount { raw, source, .. } = err;
        Self::CtaCount { raw, source }
    }
}

/// Builds the outbound messages for a submitted composer view.
///
/// Nothing is returned unless the whole form is valid. An empty recipient
/// list is a valid no-op and yields no messages.
pub fn assemble(
    state: &FormState,
    settings: &BroadcastConfig,
) -> Result<Vec<OutboundMessage>, SubmissionError> {
    let mut errors = FieldErrors::new();

    let body = state
        .require_control(MESSAGE_BLOCK, MESSAGE_ACTION)?
        .rich_text_value
        .clone()
        .unwrap_or_default();
    if body.is_empty() {
        errors.insert(MESSAGE_BLOCK.into(), "Enter a message to send.".into());
    }

    let recipients = state
        .require_control(RECIPIENTS_BLOCK, RECIPIENTS_ACTION)?
        .selected_conversations
        .clone()
        .unwrap_or_default();
    if recipients.is_empty() {
        tracing::debug!("submission has no recipients; nothing to send");
        return Ok(Vec::new());
    }

    let selection = interpret(state)?;

    let (username, icon_url) = if selection.flags.customize_sender_identity {
        sender_identity(state, &mut errors)
    } else {
        (None, None)
    };

    let cta_buttons = match selection.cta_count {
        Some(count) if selection.flags.call_to_action => cta_buttons(state, count, &mut errors)?,
        _ => Vec::new(),
    };

    if !errors.is_empty() {
        return Err(SubmissionError::Invalid(errors));
    }

    let text = notification_text(&body, settings);
    let body_block = body.into_block();

    Ok(recipients
        .into_iter()
        .map(|channel| OutboundMessage {
            channel,
            text: text.clone(),
            blocks: vec![body_block.clone()],
            username: username.clone(),
            icon_url: icon_url.clone(),
            cta_buttons: cta_buttons.clone(),
        })
        .collect())
}

fn notification_text(body: &RichText, settings: &BroadcastConfig) -> String {
    let flattened = to_plain_text(body);
    if flattened.trim().is_empty() {
        settings.notification_text.clone()
    } else {
        flattened
    }
}

/// Optional overrides; a missing or blank input means the platform default.
fn sender_identity(
    state: &FormState,
    errors: &mut FieldErrors,
) -> (Option<String>, Option<String>) {
    let text = |block_id: &str, action_id: &str| {
        state
            .control(block_id, action_id)
            .and_then(|control| control.text_value())
            .map(str::to_string)
    };

    let username = text(SENDER_NAME_BLOCK, SENDER_NAME_ACTION);
    let icon_url = text(ICON_URL_BLOCK, ICON_URL_ACTION);
    if icon_url.as_deref().is_some_and(|raw| !is_http_url(raw)) {
        errors.insert(
            ICON_URL_BLOCK.into(),
            "Enter an image URL starting with http:// or https://.".into(),
        );
    }
    (username, icon_url)
}

fn cta_buttons(
    state: &FormState,
    count: CtaCount,
    errors: &mut FieldErrors,
) -> Result<Vec<CtaButton>, SubmissionError> {
    let mut buttons = Vec::with_capacity(usize::from(count.get()));

    for index in count.indices() {
        let text_block = catalog::indexed_block_id(CTA_TEXT_BLOCK, index);
        let link_block = catalog::indexed_block_id(CTA_LINK_BLOCK, index);

        let text = state.require_control(&text_block, CTA_INPUT_ACTION)?.text_value();
        let link = state.require_control(&link_block, CTA_INPUT_ACTION)?.text_value();

        match text {
            None => {
                errors.insert(text_block, "Enter the button text.".into());
            }
            Some(text) if text.chars().count() > MAX_BUTTON_TEXT_CHARS => {
                errors.insert(
                    text_block,
                    format!("Button text is limited to {MAX_BUTTON_TEXT_CHARS} characters."),
                );
            }
            Some(_) => {}
        }
        match link {
            None => {
                errors.insert(link_block, "Enter a link for the button.".into());
            }
            Some(link) if !is_http_url(link) => {
                errors.insert(
                    link_block,
                    "Enter a valid URL starting with http:// or https://.".into(),
                );
            }
            Some(_) => {}
        }

        if let (Some(text), Some(url)) = (text, link) {
            buttons.push(CtaButton {
                text: text.to_string(),
                url: url.to_string(),
            });
        }
    }

    Ok(buttons)
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

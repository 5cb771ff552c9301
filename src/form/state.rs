//! View state snapshot as delivered with every interaction.
//!
//! Slack sends `view.state.values` as `block_id -> action_id -> value` on
//! each `block_actions` and `view_submission` payload. The snapshot is the
//! only form state the bot has; nothing is kept between events.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rich_text::RichText;
use crate::error::FormError;
use crate::transport::slack::blocks::TextObject;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextObject>,
}

impl SelectedOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: None,
        }
    }
}

/// Current value of one interactive control.
///
/// Which field is populated depends on the element type; fields Slack sends
/// as `null` for an untouched control deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlValue {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_options: Option<Vec<SelectedOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<SelectedOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_conversations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_text_value: Option<RichText>,
}

impl ControlValue {
    /// Checkbox group with at least one ticked option.
    pub fn is_checked(&self) -> bool {
        self.selected_options
            .as_ref()
            .is_some_and(|options| !options.is_empty())
    }

    /// Text input value with surrounding whitespace removed; blank is `None`.
    pub fn text_value(&self) -> Option<&str> {
        self.value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected_option
            .as_ref()
            .map(|option| option.value.as_str())
    }
}

/// `view.state` of a modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default)]
    pub values: BTreeMap<String, BTreeMap<String, ControlValue>>,
}

impl FormState {
    pub fn contains_block(&self, block_id: &str) -> bool {
        self.values.contains_key(block_id)
    }

    pub fn control(&self, block_id: &str, action_id: &str) -> Option<&ControlValue> {
        self.values.get(block_id)?.get(action_id)
    }

    pub fn require_control(
        &self,
        block_id: &str,
        action_id: &str,
    ) -> Result<&ControlValue, FormError> {
        let block = self
            .values
            .get(block_id)
            .ok_or_else(|| FormError::MissingBlock {
                block_id: block_id.to_string(),
            })?;
        block
            .get(action_id)
            .ok_or_else(|| FormError::MissingControl {
                block_id: block_id.to_string(),
                action_id: action_id.to_string(),
            })
    }

    /// Returns a copy of the snapshot with `control` written at
    /// `block_id`/`action_id`, replacing whatever was there.
    pub fn with_control(&self, block_id: &str, action_id: &str, control: ControlValue) -> Self {
        let mut next = self.clone();
        next.values
            .entry(block_id.to_string())
            .or_default()
            .insert(action_id.to_string(), control);
        next
    }

    pub fn set(&mut self, block_id: &str, action_id: &str, control: ControlValue) {
        self.values
            .entry(block_id.to_string())
            .or_default()
            .insert(action_id.to_string(), control);
    }
}

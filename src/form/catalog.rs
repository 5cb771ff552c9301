//! Block templates for every section the composer modal can show.
//!
//! Templates are built once and only ever handed out by shared reference.
//! Per-index copies of the CTA button group are produced by
//! [`super::composer::compose_cta_button_group`].

use std::sync::LazyLock;

use crate::transport::slack::blocks::{Block, BlockElement, OptionObject, TextObject};

// ── Block Kit field identifiers ─────────────────────────────────────────────

pub const MESSAGE_BLOCK: &str = "rich_text_input";
pub const MESSAGE_ACTION: &str = "rich_text_input-action";
pub const RECIPIENTS_BLOCK: &str = "multi_conversations_select";
pub const RECIPIENTS_ACTION: &str = "multi_conversations_select-action";
pub const BASE_DIVIDER_BLOCK: &str = "divider_1";

pub const SENDER_IDENTITY_TOGGLE_BLOCK: &str = "customize_sender_identity";
pub const SENDER_IDENTITY_TOGGLE_ACTION: &str = "customize_sender_identity-action";
pub const CALL_TO_ACTION_TOGGLE_BLOCK: &str = "call_to_action";
pub const CALL_TO_ACTION_TOGGLE_ACTION: &str = "call_to_action-action";

pub const SENDER_NAME_BLOCK: &str = "sender_name";
pub const SENDER_NAME_ACTION: &str = "plain_text_input-action";
pub const ICON_URL_BLOCK: &str = "icon_url";
pub const ICON_URL_ACTION: &str = "icon_url-action";

pub const CTA_DROPDOWN_BLOCK: &str = "call_to_action_dropdown";
pub const CTA_DROPDOWN_ACTION: &str = "call_to_action_dropdown-action";

pub const CTA_HEADER_BLOCK: &str = "cta_button_header";
pub const CTA_TEXT_BLOCK: &str = "cta_button_text";
pub const CTA_LINK_BLOCK: &str = "cta_button_link";
pub const CTA_INPUT_ACTION: &str = "plain_text_input-action";

/// Block id prefix of the link buttons attached to a broadcast message.
pub const MESSAGE_BUTTON_BLOCK: &str = "button_id";
/// Action id prefix of the link buttons attached to a broadcast message.
pub const MESSAGE_BUTTON_ACTION: &str = "button_action";

pub const MAX_CTA_BUTTONS: u8 = 3;

/// Block id of an indexed CTA field, e.g. `cta_button_text_2`.
pub fn indexed_block_id(base: &str, index: u8) -> String {
    format!("{base}_{index}")
}

// ── Templates ───────────────────────────────────────────────────────────────

static BASE_FIELDS: LazyLock<Vec<Block>> = LazyLock::new(|| {
    vec![
        Block::Input {
            block_id: MESSAGE_BLOCK.into(),
            label: TextObject::plain("Message"),
            element: BlockElement::RichTextInput {
                action_id: MESSAGE_ACTION.into(),
            },
            hint: None,
            optional: false,
        },
        Block::Section {
            block_id: RECIPIENTS_BLOCK.into(),
            text: TextObject::mrkdwn("*Send message to:*"),
            accessory: Some(BlockElement::MultiConversationsSelect {
                action_id: RECIPIENTS_ACTION.into(),
                placeholder: Some(TextObject::plain("Select conversations")),
            }),
        },
        Block::divider(BASE_DIVIDER_BLOCK),
    ]
});

static FEATURE_TOGGLE_FIELDS: LazyLock<[Block; 2]> = LazyLock::new(|| {
    [
        toggle(
            SENDER_IDENTITY_TOGGLE_BLOCK,
            SENDER_IDENTITY_TOGGLE_ACTION,
            "*Do you need to customize the sender identity?*",
            "I want to specify a custom sender name and a custom icon for my message, \
             so that I can align the message's persona with its content.",
            "value-0",
        ),
        toggle(
            CALL_TO_ACTION_TOGGLE_BLOCK,
            CALL_TO_ACTION_TOGGLE_ACTION,
            "*Do you need add in-context call to action?*",
            "I want to add one or more clickable buttons with external links to my message, \
             so that I can guide users to take a specific, immediate action.",
            "value-1",
        ),
    ]
});

static IDENTITY_FIELDS: LazyLock<Vec<Block>> = LazyLock::new(|| {
    vec![
        Block::divider("start_sender_identity_fields"),
        Block::Input {
            block_id: SENDER_NAME_BLOCK.into(),
            label: TextObject::plain("Sender Name"),
            element: BlockElement::PlainTextInput {
                action_id: SENDER_NAME_ACTION.into(),
                placeholder: Some(TextObject::plain_bare(
                    "If left blank, the default name is used.",
                )),
            },
            hint: Some(TextObject::plain_bare(
                "A Slack bot's display name is limited to a maximum of 21 characters.",
            )),
            optional: true,
        },
        Block::Input {
            block_id: ICON_URL_BLOCK.into(),
            label: TextObject::plain("Icon URL"),
            element: BlockElement::PlainTextInput {
                action_id: ICON_URL_ACTION.into(),
                placeholder: Some(TextObject::plain_bare(
                    "If left blank, the default icon is used.",
                )),
            },
            hint: None,
            optional: true,
        },
        Block::divider("end_sender_identity_fields"),
    ]
});

static CTA_COUNT_SELECTOR: LazyLock<Vec<Block>> = LazyLock::new(|| {
    let options = (1..=MAX_CTA_BUTTONS)
        .map(|count| OptionObject::plain(count.to_string(), count.to_string()))
        .collect();

    vec![
        Block::divider("start_call_to_action_dropdown"),
        Block::Section {
            block_id: CTA_DROPDOWN_BLOCK.into(),
            text: TextObject::mrkdwn("How many in-context call action will you need?"),
            accessory: Some(BlockElement::StaticSelect {
                action_id: CTA_DROPDOWN_ACTION.into(),
                placeholder: Some(TextObject::plain("Select an item")),
                options,
            }),
        },
        Block::Context {
            block_id: "cta_buttons_hint".into(),
            elements: vec![TextObject::plain("You can add up to three actions.")],
        },
    ]
});

static CTA_BUTTON_GROUP_TEMPLATE: LazyLock<[Block; 3]> = LazyLock::new(|| {
    [
        Block::Header {
            block_id: CTA_HEADER_BLOCK.into(),
            text: TextObject::plain("CTA Button"),
        },
        Block::Input {
            block_id: CTA_TEXT_BLOCK.into(),
            label: TextObject::plain("Button Text"),
            element: BlockElement::PlainTextInput {
                action_id: CTA_INPUT_ACTION.into(),
                placeholder: None,
            },
            hint: Some(TextObject::plain_bare(
                "The character limit for button text in a Slack Block Kit button element is 75 \
                 characters. The text may appear truncated around 30 characters depending on \
                 the display device.",
            )),
            optional: false,
        },
        Block::Input {
            block_id: CTA_LINK_BLOCK.into(),
            label: TextObject::plain("Link"),
            element: BlockElement::PlainTextInput {
                action_id: CTA_INPUT_ACTION.into(),
                placeholder: None,
            },
            hint: Some(TextObject::plain_bare(
                "Please provide a valid URL (including http:// or https://).",
            )),
            optional: false,
        },
    ]
});

fn toggle(block_id: &str, action_id: &str, text: &str, description: &str, value: &str) -> Block {
    Block::Actions {
        block_id: block_id.into(),
        elements: vec![BlockElement::Checkboxes {
            action_id: action_id.into(),
            options: vec![OptionObject {
                text: TextObject::mrkdwn(text),
                description: Some(TextObject::plain(description)),
                value: value.into(),
            }],
        }],
    }
}

/// Message input, recipient picker and the divider below them.
pub fn base_fields() -> &'static [Block] {
    &BASE_FIELDS
}

/// Sender identity checkbox followed by the call-to-action checkbox.
pub fn feature_toggle_fields() -> &'static [Block; 2] {
    &FEATURE_TOGGLE_FIELDS
}

/// Optional sender name and icon URL inputs, fenced by dividers.
pub fn identity_fields() -> &'static [Block] {
    &IDENTITY_FIELDS
}

/// "How many buttons" dropdown with its divider and hint.
pub fn cta_count_selector() -> &'static [Block] {
    &CTA_COUNT_SELECTOR
}

/// Unindexed header / text / link triple for one CTA button.
pub fn cta_button_group_template() -> &'static [Block; 3] {
    &CTA_BUTTON_GROUP_TEMPLATE
}

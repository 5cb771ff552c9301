//! Rich text message body.
//!
//! The message input is a `rich_text_input`, so the body arrives as a
//! `rich_text` node tree. The tree is forwarded to `chat.postMessage`
//! unchanged; a flattened plain-text rendering serves as the notification
//! fallback (`text`) Slack shows in push notifications and screen readers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transport::slack::blocks::Block;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub elements: Vec<Value>,
}

impl RichText {
    pub fn is_empty(&self) -> bool {
        to_plain_text(self).trim().is_empty()
    }

    pub fn into_block(self) -> Block {
        Block::RichText {
            block_id: None,
            elements: self.elements,
        }
    }
}

/// Flattens a rich text tree into mrkdwn-ish plain text.
pub fn to_plain_text(rich_text: &RichText) -> String {
    let mut out = String::new();
    for (index, element) in rich_text.elements.iter().enumerate() {
        if index > 0 && !out.ends_with('\n') {
            out.push('\n');
        }
        render_container(element, &mut out);
    }
    out.trim_end().to_string()
}

fn render_container(node: &Value, out: &mut String) {
    match node_type(node) {
        "rich_text_list" => {
            let ordered = node.get("style").and_then(Value::as_str) == Some("ordered");
            for (index, item) in children(node).iter().enumerate() {
                if ordered {
                    out.push_str(&format!("{}. ", index + 1));
                } else {
                    out.push_str("• ");
                }
                render_inline_children(item, out);
                out.push('\n');
            }
        }
        "rich_text_quote" => {
            out.push_str("> ");
            render_inline_children(node, out);
        }
        "rich_text_preformatted" => {
            out.push_str("```");
            render_inline_children(node, out);
            out.push_str("```");
        }
        _ => render_inline_children(node, out),
    }
}

fn render_inline_children(node: &Value, out: &mut String) {
    for child in children(node) {
        render_inline(child, out);
    }
}

fn render_inline(node: &Value, out: &mut String) {
    let field = |name: &str| node.get(name).and_then(Value::as_str).unwrap_or_default();
    match node_type(node) {
        "text" => out.push_str(field("text")),
        "link" => {
            let text = field("text");
            out.push_str(if text.is_empty() { field("url") } else { text });
        }
        "emoji" => {
            out.push(':');
            out.push_str(field("name"));
            out.push(':');
        }
        "user" => out.push_str(&format!("<@{}>", field("user_id"))),
        "channel" => out.push_str(&format!("<#{}>", field("channel_id"))),
        "usergroup" => out.push_str(&format!("<!subteam^{}>", field("usergroup_id"))),
        "broadcast" => out.push_str(&format!("<!{}>", field("range"))),
        _ => render_container(node, out),
    }
}

fn node_type(node: &Value) -> &str {
    node.get("type").and_then(Value::as_str).unwrap_or_default()
}

fn children(node: &Value) -> &[Value] {
    node.get("elements")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

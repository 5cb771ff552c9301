//! Assembles the modal's block list from feature flags and a CTA count.
//!
//! Every function here is pure: identical inputs always produce an identical
//! block list, and nothing reaches back into the catalog to mutate it.

use super::catalog::{
    self, base_fields, cta_button_group_template, cta_count_selector, feature_toggle_fields,
    identity_fields,
};
use super::interpreter::{CtaCount, FeatureFlags};
use crate::config::ModalConfig;
use crate::transport::slack::blocks::{Block, ModalView, TextObject};

/// Callback id of the composer modal; `view_submission` payloads carrying
/// it are broadcast requests.
pub const COMPOSER_CALLBACK_ID: &str = "broadcast_composer";

/// One header / text / link group for CTA button `index` (1-based).
///
/// Block ids gain an `_{index}` suffix and labels a ` {index}` suffix, so
/// group 2 is `cta_button_header_2` "CTA Button 2", `cta_button_text_2`
/// "Button Text 2" and `cta_button_link_2` "Link 2".
pub fn compose_cta_button_group(index: u8) -> [Block; 3] {
    cta_button_group_template()
        .clone()
        .map(|block| with_index(block, index))
}

/// Groups `1..=count`, concatenated in ascending order.
pub fn compose_cta_button_groups(count: CtaCount) -> Vec<Block> {
    count.indices().flat_map(compose_cta_button_group).collect()
}

/// Full block list for the given state of the form.
///
/// Order: base fields, identity toggle, identity fields (when on), CTA
/// toggle, CTA dropdown (when on), then the button groups. The count is
/// ignored while the CTA section is off.
pub fn compose_form_view(flags: FeatureFlags, cta_count: Option<CtaCount>) -> Vec<Block> {
    let [identity_toggle, cta_toggle] = feature_toggle_fields();

    let mut blocks = base_fields().to_vec();
    blocks.push(identity_toggle.clone());
    if flags.customize_sender_identity {
        blocks.extend_from_slice(identity_fields());
    }
    blocks.push(cta_toggle.clone());
    if flags.call_to_action {
        blocks.extend_from_slice(cta_count_selector());
        if let Some(count) = cta_count {
            blocks.extend(compose_cta_button_groups(count));
        }
    }
    blocks
}

/// Wraps a block list in the composer modal envelope.
pub fn compose_modal(settings: &ModalConfig, blocks: Vec<Block>) -> ModalView {
    ModalView {
        callback_id: COMPOSER_CALLBACK_ID.to_string(),
        title: TextObject::plain(&settings.title),
        submit: TextObject::plain(&settings.submit_label),
        close: TextObject::plain(&settings.close_label),
        private_metadata: String::new(),
        blocks,
    }
}

/// The modal a fresh shortcut opens: base fields and both toggles, unchecked.
pub fn initial_modal(settings: &ModalConfig) -> ModalView {
    compose_modal(settings, compose_form_view(FeatureFlags::default(), None))
}

fn with_index(mut block: Block, index: u8) -> Block {
    match &mut block {
        Block::Header { block_id, text } => {
            *block_id = catalog::indexed_block_id(block_id, index);
            text.text = format!("{} {index}", text.text);
        }
        Block::Input {
            block_id, label, ..
        } => {
            *block_id = catalog::indexed_block_id(block_id, index);
            label.text = format!("{} {index}", label.text);
        }
        Block::Section { block_id, .. }
        | Block::Divider { block_id }
        | Block::Actions { block_id, .. }
        | Block::Context { block_id, .. } => {
            *block_id = catalog::indexed_block_id(block_id, index);
        }
        Block::RichText { .. } => {}
    }
    block
}

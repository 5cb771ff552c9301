//! Decides what the composer modal looks like after a control fires.
//!
//! The form has four shapes ([`FormMode`]) and three controls that move
//! between them ([`Trigger`]). Each step interprets the post-change
//! snapshot, rebuilds the whole block list and yields one `views.update`
//! command pinned to the view id and hash the event carried.

use thiserror::Error;

use super::catalog::{
    CALL_TO_ACTION_TOGGLE_ACTION, CTA_DROPDOWN_ACTION, SENDER_IDENTITY_TOGGLE_ACTION,
};
use super::composer::{compose_form_view, compose_modal};
use super::interpreter::{FeatureFlags, FormSelection, InterpretError, interpret};
use crate::config::ModalConfig;
use crate::transport::slack::blocks::ModalView;
use crate::transport::slack::interaction::{BlockAction, ViewPayload};

/// Control whose change reshapes the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Trigger {
    SenderIdentityToggled,
    CallToActionToggled,
    CtaCountChanged,
}

impl Trigger {
    pub fn from_action_id(action_id: &str) -> Option<Self> {
        match action_id {
            SENDER_IDENTITY_TOGGLE_ACTION => Some(Self::SenderIdentityToggled),
            CALL_TO_ACTION_TOGGLE_ACTION => Some(Self::CallToActionToggled),
            CTA_DROPDOWN_ACTION => Some(Self::CtaCountChanged),
            _ => None,
        }
    }
}

/// Which optional sections are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FormMode {
    None,
    SenderOnly,
    CtaOnly,
    Both,
}

impl From<FeatureFlags> for FormMode {
    fn from(flags: FeatureFlags) -> Self {
        match (flags.customize_sender_identity, flags.call_to_action) {
            (false, false) => Self::None,
            (true, false) => Self::SenderOnly,
            (false, true) => Self::CtaOnly,
            (true, true) => Self::Both,
        }
    }
}

/// `views.update` command produced by one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewReplace {
    pub view_id: String,
    pub hash: String,
    pub mode: FormMode,
    pub view: ModalView,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("action {0} does not reshape the composer form")]
    UnknownTrigger(String),
}

/// Computes the next view for `action` fired inside `view`.
///
/// The firing control's new value is written over the snapshot before it is
/// interpreted. When the CTA checkbox itself fired, its value alone decides
/// the CTA section: the dropdown in the snapshot belongs to the view being
/// replaced.
pub fn transition(
    view: &ViewPayload,
    action: &BlockAction,
    settings: &ModalConfig,
) -> Result<ViewReplace, TransitionError> {
    let trigger = Trigger::from_action_id(&action.action_id)
        .ok_or_else(|| TransitionError::UnknownTrigger(action.action_id.clone()))?;

    let state = view
        .state
        .with_control(&action.block_id, &action.action_id, action.control.clone());

    let selection = match interpret(&state) {
        Ok(selection) => selection,
        Err(InterpretError::UnparseableCtaCount { flags, raw, source }) => {
            tracing::warn!(
                view_id = %view.id,
                raw = %raw,
                error = %source,
                "CTA count unreadable; rendering dropdown without button fields"
            );
            FormSelection {
                flags,
                cta_count: None,
            }
        }
    };

    let flags = match trigger {
        Trigger::CallToActionToggled => FeatureFlags {
            call_to_action: action.control.is_checked(),
            ..selection.flags
        },
        Trigger::SenderIdentityToggled | Trigger::CtaCountChanged => selection.flags,
    };
    let mode = FormMode::from(flags);

    tracing::debug!(
        view_id = %view.id,
        %trigger,
        %mode,
        cta_count = ?selection.cta_count.map(|count| count.get()),
        "recomposing composer view"
    );

    let blocks = compose_form_view(flags, selection.cta_count);
    Ok(ViewReplace {
        view_id: view.id.clone(),
        hash: view.hash.clone(),
        mode,
        view: compose_modal(settings, blocks),
    })
}

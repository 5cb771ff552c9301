//! Routes Socket Mode envelopes to the composer form.
//!
//! The acknowledgement for an envelope is decided synchronously: a view
//! submission is assembled and validated before the ack is written, so
//! input errors can travel back on the ack and keep the modal open. All
//! Web API calls happen afterwards, in [`InteractionHandler::execute`].

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Value, json};

use super::broadcast::{BroadcastReport, send_all};
use crate::config::{BroadcastConfig, ModalConfig};
use crate::form::catalog::{MESSAGE_BLOCK, MESSAGE_BUTTON_ACTION};
use crate::form::composer::{COMPOSER_CALLBACK_ID, initial_modal};
use crate::form::submission::{OutboundMessage, assemble};
use crate::form::transition::{Trigger, transition};
use crate::transport::slack::SlackApi;
use crate::transport::slack::interaction::{
    BlockActionsPayload, InteractionPayload, SocketEnvelope, ViewSubmissionPayload,
};
use crate::transport::slack::socket::EnvelopeHandler;

const UNREADABLE_FORM_MESSAGE: &str =
    "This form could not be read. Close it and open the composer again.";

/// What is left to do once an envelope has been acknowledged.
#[derive(Debug)]
pub enum Work {
    None,
    OpenComposer { trigger_id: String },
    Actions(Box<BlockActionsPayload>),
    Broadcast {
        user_id: String,
        messages: Vec<OutboundMessage>,
    },
}

pub struct InteractionHandler {
    api: Arc<dyn SlackApi>,
    modal: ModalConfig,
    broadcast: BroadcastConfig,
}

impl InteractionHandler {
    pub fn new(api: Arc<dyn SlackApi>, modal: ModalConfig, broadcast: BroadcastConfig) -> Self {
        Self {
            api,
            modal,
            broadcast,
        }
    }

    /// Decides the ack payload for `envelope` and the work it leaves behind.
    pub fn prepare(&self, envelope: SocketEnvelope) -> (Option<Value>, Work) {
        match envelope.kind.as_str() {
            "interactive" => {}
            "events_api" | "slash_commands" => {
                tracing::debug!(kind = %envelope.kind, "ignoring non-interactive envelope");
                return (None, Work::None);
            }
            other => {
                tracing::debug!(kind = other, "ignoring unknown envelope type");
                return (None, Work::None);
            }
        }

        let Some(payload) = envelope.payload else {
            tracing::warn!("interactive envelope without payload");
            return (None, Work::None);
        };
        let interaction: InteractionPayload = match serde_json::from_value(payload) {
            Ok(interaction) => interaction,
            Err(e) => {
                tracing::warn!("unreadable interactive payload: {e}");
                return (None, Work::None);
            }
        };
        tracing::debug!(
            envelope_id = envelope.envelope_id.as_deref().unwrap_or_default(),
            interaction = interaction.kind(),
            "interaction received"
        );

        match interaction {
            InteractionPayload::Shortcut(shortcut) => {
                if shortcut.callback_id == self.modal.shortcut_callback_id {
                    tracing::info!(user = %shortcut.user.id, "opening composer");
                    (
                        None,
                        Work::OpenComposer {
                            trigger_id: shortcut.trigger_id,
                        },
                    )
                } else {
                    tracing::debug!(callback_id = %shortcut.callback_id, "ignoring unknown shortcut");
                    (None, Work::None)
                }
            }
            InteractionPayload::BlockActions(actions) => (None, Work::Actions(Box::new(actions))),
            InteractionPayload::ViewSubmission(submission) => self.prepare_submission(submission),
            InteractionPayload::ViewClosed(closed) => {
                tracing::info!(
                    user = %closed.user.id,
                    view_id = %closed.view.id,
                    cleared = closed.is_cleared,
                    "composer closed without sending"
                );
                (None, Work::None)
            }
            InteractionPayload::Unsupported => {
                tracing::debug!("ignoring unsupported interaction type");
                (None, Work::None)
            }
        }
    }

    fn prepare_submission(&self, submission: ViewSubmissionPayload) -> (Option<Value>, Work) {
        if submission.view.callback_id != COMPOSER_CALLBACK_ID {
            tracing::debug!(callback_id = %submission.view.callback_id, "ignoring foreign view submission");
            return (None, Work::None);
        }

        match assemble(&submission.view.state, &self.broadcast) {
            Ok(messages) => {
                tracing::info!(
                    user = %submission.user.id,
                    recipients = messages.len(),
                    "broadcast submitted"
                );
                (
                    None,
                    Work::Broadcast {
                        user_id: submission.user.id,
                        messages,
                    },
                )
            }
            Err(err) => {
                let errors = match err.field_errors() {
                    Some(errors) => {
                        tracing::info!(view_id = %submission.view.id, "{err}");
                        errors.clone()
                    }
                    None => {
                        tracing::error!(view_id = %submission.view.id, "rejecting submission: {err}");
                        BTreeMap::from([(MESSAGE_BLOCK.to_string(), UNREADABLE_FORM_MESSAGE.into())])
                    }
                };
                (Some(errors_ack(&errors)), Work::None)
            }
        }
    }

    pub async fn execute(&self, work: Work) {
        match work {
            Work::None => {}
            Work::OpenComposer { trigger_id } => {
                let view = initial_modal(&self.modal);
                match self.api.open_view(&trigger_id, &view).await {
                    Ok(view_id) => tracing::debug!(%view_id, "composer opened"),
                    Err(e) => tracing::error!("failed to open composer: {e}"),
                }
            }
            Work::Actions(payload) => self.handle_actions(*payload).await,
            Work::Broadcast { user_id, messages } => {
                let report = self.send(&messages).await;
                tracing::info!(
                    user = %user_id,
                    delivered = report.delivered.len(),
                    failed = report.failed.len(),
                    "broadcast finished"
                );
            }
        }
    }

    async fn send(&self, messages: &[OutboundMessage]) -> BroadcastReport {
        send_all(
            self.api.as_ref(),
            messages,
            self.broadcast.max_concurrent_sends,
        )
        .await
    }

    async fn handle_actions(&self, payload: BlockActionsPayload) {
        for action in &payload.actions {
            if Trigger::from_action_id(&action.action_id).is_none() {
                if action.action_id.starts_with(MESSAGE_BUTTON_ACTION) {
                    tracing::info!(
                        user = %payload.user.id,
                        action_id = %action.action_id,
                        "CTA button clicked"
                    );
                } else {
                    tracing::debug!(action_id = %action.action_id, "no handler for action");
                }
                continue;
            }

            let Some(view) = payload.view.as_ref() else {
                tracing::warn!(action_id = %action.action_id, "form action without a view");
                continue;
            };

            let replace = match transition(view, action, &self.modal) {
                Ok(replace) => replace,
                Err(e) => {
                    tracing::warn!("{e}");
                    continue;
                }
            };

            match self
                .api
                .update_view(&replace.view_id, &replace.hash, &replace.view)
                .await
            {
                Ok(()) => tracing::debug!(view_id = %replace.view_id, mode = %replace.mode, "view updated"),
                Err(e) if e.is_hash_conflict() => tracing::warn!(
                    view_id = %replace.view_id,
                    "view changed before the update landed; waiting for the next interaction"
                ),
                Err(e) => tracing::error!(view_id = %replace.view_id, "view update failed: {e}"),
            }
        }
    }
}

impl EnvelopeHandler for InteractionHandler {
    type Work = Work;

    fn acknowledge(&self, envelope: SocketEnvelope) -> (Option<Value>, Work) {
        self.prepare(envelope)
    }

    fn process<'a>(&'a self, work: Work) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(self.execute(work))
    }
}

/// `view_submission` ack that keeps the modal open and shows `errors`
/// under the matching inputs.
fn errors_ack(errors: &BTreeMap<String, String>) -> Value {
    json!({ "response_action": "errors", "errors": errors })
}

//! Slack platform seam: Block Kit types, inbound payloads, the Web API
//! client and the Socket Mode listener.

pub mod blocks;
mod client;
pub mod interaction;
pub mod socket;

use std::future::Future;
use std::pin::Pin;

pub use client::{AuthIdentity, SlackClient};

use crate::error::SlackApiError;
use crate::form::submission::OutboundMessage;
use blocks::ModalView;

pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SlackApiError>> + Send + 'a>>;

/// Outbound Slack Web API calls the bot makes.
pub trait SlackApi: Send + Sync {
    /// `views.open`; returns the new view id.
    fn open_view<'a>(&'a self, trigger_id: &'a str, view: &'a ModalView) -> ApiFuture<'a, String>;

    /// `views.update`, guarded by the view hash the triggering event carried.
    fn update_view<'a>(
        &'a self,
        view_id: &'a str,
        hash: &'a str,
        view: &'a ModalView,
    ) -> ApiFuture<'a, ()>;

    /// `views.push`; stacks a view on top of the open one.
    fn push_view<'a>(&'a self, trigger_id: &'a str, view: &'a ModalView) -> ApiFuture<'a, String>;

    /// `chat.postMessage`; returns the message timestamp.
    fn post_message<'a>(&'a self, message: &'a OutboundMessage) -> ApiFuture<'a, String>;

    /// `auth.test` with the bot token.
    fn auth_test(&self) -> ApiFuture<'_, AuthIdentity>;

    /// `apps.connections.open` with the app-level token; returns a `wss://` URL.
    fn open_socket_connection(&self) -> ApiFuture<'_, String>;
}

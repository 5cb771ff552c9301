//! Socket Mode listener.
//!
//! One session: `apps.connections.open`, connect to the returned `wss://`
//! URL, then read frames until Slack asks us to reconnect or the socket
//! drops. Every envelope is acknowledged as soon as it is read; its work
//! runs afterwards on a worker task, one envelope at a time in arrival order.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use super::SlackApi;
use super::interaction::SocketEnvelope;
use crate::transport::runtime::Listener;

/// Application side of the socket: decides the acknowledgement for an
/// envelope, then performs whatever the envelope asked for.
pub trait EnvelopeHandler: Send + Sync {
    type Work: Send + 'static;

    /// Builds the optional ack payload and the deferred work. Runs before
    /// the ack is written, so it must not wait on the network.
    fn acknowledge(&self, envelope: SocketEnvelope) -> (Option<Value>, Self::Work);

    fn process<'a>(&'a self, work: Self::Work) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// What one text frame amounts to.
#[derive(Debug)]
pub enum Frame<W> {
    Hello,
    /// Slack is about to close this connection; reconnect.
    Disconnect(String),
    /// Serialized ack to write back, then the work to perform.
    Ack(String, W),
    Ignored,
}

pub struct SocketModeListener<H> {
    api: Arc<dyn SlackApi>,
    handler: Arc<H>,
}

impl<H: EnvelopeHandler + 'static> SocketModeListener<H> {
    pub fn new(api: Arc<dyn SlackApi>, handler: Arc<H>) -> Self {
        Self { api, handler }
    }

    /// Classifies one text frame and, for envelopes, asks the handler for
    /// the acknowledgement.
    pub fn read_frame(&self, text: &str) -> Frame<H::Work> {
        let envelope: SocketEnvelope = match serde_json::from_str(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("Slack: unparseable Socket Mode frame: {e}");
                return Frame::Ignored;
            }
        };

        match envelope.kind.as_str() {
            "hello" => return Frame::Hello,
            "disconnect" => {
                let reason = envelope.reason.unwrap_or_else(|| "unknown".into());
                return Frame::Disconnect(reason);
            }
            _ => {}
        }

        let Some(envelope_id) = envelope.envelope_id.clone() else {
            tracing::warn!(kind = %envelope.kind, "Slack: envelope without envelope_id");
            return Frame::Ignored;
        };

        let (payload, work) = self.handler.acknowledge(envelope);
        Frame::Ack(ack_message(&envelope_id, payload), work)
    }

    /// Runs a single Socket Mode session. Returns `Ok` when Slack requests a
    /// reconnect or the stream ends; the supervisor starts the next one.
    pub async fn run_session(&self) -> Result<()> {
        let wss_url = self
            .api
            .open_socket_connection()
            .await
            .context("open Socket Mode connection")?;
        validate_wss_url(&wss_url)?;

        let (ws_stream, _) = tokio_tungstenite::connect_async(wss_url.as_str())
            .await
            .context("connect Socket Mode websocket")?;
        let (write, read) = ws_stream.split();
        tracing::info!("Slack: Socket Mode connected");

        self.serve(read, write).await
    }

    /// Reads frames until the peer hangs up. Acks and pongs are written
    /// inline; envelope work goes to a single worker task, so a slow
    /// broadcast never holds back the next ack and work still runs in
    /// arrival order.
    pub async fn serve<R, W>(&self, mut read: R, mut write: W) -> Result<()>
    where
        R: Stream<Item = Result<Message, WsError>> + Unpin,
        W: Sink<Message, Error = WsError> + Unpin,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        spawn_worker(Arc::clone(&self.handler), rx);

        // The worker drains queued work and exits once `tx` drops.
        self.read_loop(&mut read, &mut write, &tx).await
    }

    async fn read_loop<R, W>(
        &self,
        read: &mut R,
        write: &mut W,
        tx: &mpsc::UnboundedSender<H::Work>,
    ) -> Result<()>
    where
        R: Stream<Item = Result<Message, WsError>> + Unpin,
        W: Sink<Message, Error = WsError> + Unpin,
    {
        while let Some(message) = read.next().await {
            let message = message.context("read Socket Mode frame")?;
            match message {
                Message::Text(text) => match self.read_frame(&text) {
                    Frame::Hello => tracing::info!("Slack: Socket Mode hello received"),
                    Frame::Disconnect(reason) => {
                        tracing::info!(%reason, "Slack: disconnect requested, reconnecting");
                        return Ok(());
                    }
                    Frame::Ack(ack, work) => {
                        write
                            .send(Message::Text(ack.into()))
                            .await
                            .context("send Socket Mode ack")?;
                        tx.send(work)
                            .map_err(|_| anyhow::anyhow!("envelope worker stopped"))?;
                    }
                    Frame::Ignored => {}
                },
                Message::Ping(data) => {
                    write
                        .send(Message::Pong(data))
                        .await
                        .context("send Socket Mode pong")?;
                }
                Message::Close(_) => {
                    tracing::info!("Slack: Socket Mode closed by server, reconnecting");
                    return Ok(());
                }
                _ => {}
            }
        }

        tracing::info!("Slack: Socket Mode stream ended, reconnecting");
        Ok(())
    }
}

fn spawn_worker<H: EnvelopeHandler + 'static>(
    handler: Arc<H>,
    mut rx: mpsc::UnboundedReceiver<H::Work>,
) {
    tokio::spawn(async move {
        while let Some(work) = rx.recv().await {
            handler.process(work).await;
        }
    });
}

impl<H: EnvelopeHandler + 'static> Listener for SocketModeListener<H> {
    fn name(&self) -> &str {
        "slack-socket-mode"
    }

    fn listen(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(self.run_session())
    }
}

fn ack_message(envelope_id: &str, payload: Option<Value>) -> String {
    let mut ack = json!({ "envelope_id": envelope_id });
    if let Some(payload) = payload {
        ack["payload"] = payload;
    }
    ack.to_string()
}

/// A Socket Mode URL must be `wss://` on a Slack host.
pub fn validate_wss_url(raw: &str) -> Result<()> {
    let url = url::Url::parse(raw).context("parse Socket Mode URL")?;
    if url.scheme() != "wss" {
        bail!(
            "Slack: WebSocket URL must use wss:// scheme, got: {}",
            url.scheme()
        );
    }
    let host = url.host_str().unwrap_or_default();
    if host != "slack.com" && !host.ends_with(".slack.com") {
        bail!("Slack: WebSocket URL host must be *.slack.com, got: {host}");
    }
    Ok(())
}

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::Config;
use crate::cli::commands::{Cli, Commands};
use crate::form::composer::{compose_form_view, compose_modal};
use crate::form::interpreter::{CtaCount, FeatureFlags};
use crate::transport::runtime::{Listener, socket_backoff_settings, spawn_supervised_listener};
use crate::transport::slack::SlackClient;
use crate::transport::slack::socket::SocketModeListener;

use super::handler::InteractionHandler;

/// Serve the composer over Socket Mode until Ctrl-C.
async fn run_bot(config: Arc<Config>) -> Result<()> {
    config.validate()?;
    config.slack.validate_tokens()?;

    let client = Arc::new(SlackClient::from_config(&config.slack));
    let handler = Arc::new(InteractionHandler::new(
        client.clone(),
        config.modal.clone(),
        config.broadcast.clone(),
    ));
    let listener: Arc<dyn Listener> = Arc::new(SocketModeListener::new(client, handler));

    let (initial_backoff, max_backoff) = socket_backoff_settings(&config.reliability);
    info!(
        shortcut = %config.modal.shortcut_callback_id,
        "Starting commsbot over Socket Mode"
    );
    let supervisor = spawn_supervised_listener(listener, initial_backoff, max_backoff);

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;
    info!("Shutting down");
    supervisor.abort();
    let _ = supervisor.await;
    Ok(())
}

/// Renders the modal for the given toggles as pretty JSON.
fn render_preview(config: &Config, identity: bool, cta: bool, count: Option<u8>) -> Result<String> {
    let cta_count = count.map(CtaCount::new).transpose()?;
    let blocks = compose_form_view(FeatureFlags::new(identity, cta), cta_count);
    let view = compose_modal(&config.modal, blocks);
    Ok(serde_json::to_string_pretty(&view)?)
}

pub async fn dispatch(cli: Cli, config: Arc<Config>) -> Result<()> {
    match cli.command {
        Commands::Run => run_bot(config).await,

        Commands::Preview {
            identity,
            cta,
            count,
        } => {
            println!("{}", render_preview(&config, identity, cta, count)?);
            Ok(())
        }

        Commands::Doctor => {
            let client = SlackClient::from_config(&config.slack);
            super::doctor::run(&config, &client).await
        }
    }
}

#![warn(clippy::all, clippy::pedantic)]

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use commsbot::Config;
use commsbot::app::dispatch::dispatch;
use commsbot::cli::Cli;
use commsbot::observability::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Both ring and aws-lc-rs may be linked; pick one explicitly.
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: Failed to install default crypto provider: {e:?}");
    }

    let cli = Cli::parse();
    let mut config = Config::load_or_init()?;
    config.apply_env_overrides();
    init_logging(config.observability.log_level)?;

    dispatch(cli, Arc::new(config)).await
}

use clap::{Parser, Subcommand};

/// `commsbot` - compose a Slack message once, broadcast it to many conversations.
#[derive(Parser, Debug)]
#[command(name = "commsbot")]
#[command(version = "0.1.0")]
#[command(
    about = "Slack modal composer that broadcasts a message to selected conversations.",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect over Socket Mode and serve the composer until interrupted
    Run,

    /// Print the modal JSON the composer renders for a given form state
    Preview {
        /// Render with the sender identity section switched on
        #[arg(long)]
        identity: bool,

        /// Render with the call-to-action section switched on
        #[arg(long)]
        cta: bool,

        /// Number of CTA button groups to render (1-3, needs --cta)
        #[arg(long, requires = "cta", value_parser = clap::value_parser!(u8).range(1..=3))]
        count: Option<u8>,
    },

    /// Validate configuration and check the bot token with auth.test
    Doctor,
}

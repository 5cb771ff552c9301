use tracing_subscriber::FmtSubscriber;

use crate::config::LogLevel;

/// Installs the global fmt subscriber at `level`.
///
/// Fails if a global subscriber is already set, which only happens when a
/// caller installs logging twice.
pub fn init_logging(level: LogLevel) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::from(level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("setting default subscriber failed: {e}"))
}

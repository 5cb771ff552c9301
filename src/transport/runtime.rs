use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

const MIN_SOCKET_INITIAL_BACKOFF_SECS: u64 = 1;
const MIN_SOCKET_MAX_BACKOFF_SECS: u64 = 1;

/// A long-running inbound connection that can be restarted.
pub trait Listener: Send + Sync {
    fn name(&self) -> &str;

    /// Runs one connection to completion. `Ok` means the peer asked us to
    /// reconnect; `Err` means the connection failed.
    fn listen(&self) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>>;
}

pub(crate) fn socket_backoff_settings(
    reliability: &crate::config::ReliabilityConfig,
) -> (u64, u64) {
    let initial_backoff_secs = reliability
        .socket_initial_backoff_secs
        .max(MIN_SOCKET_INITIAL_BACKOFF_SECS);
    let max_backoff_secs = reliability
        .socket_max_backoff_secs
        .max(MIN_SOCKET_MAX_BACKOFF_SECS);

    (initial_backoff_secs, max_backoff_secs)
}

/// Returns `(delay, next_backoff)` for the restart after a session ended.
/// A clean end waits the initial backoff and resets it; a failure waits the
/// current backoff and doubles it up to `max_backoff_secs`.
fn restart_delay(
    failed: bool,
    backoff_secs: u64,
    initial_backoff_secs: u64,
    max_backoff_secs: u64,
) -> (u64, u64) {
    if failed {
        (backoff_secs, backoff_secs.saturating_mul(2).min(max_backoff_secs))
    } else {
        (initial_backoff_secs, initial_backoff_secs)
    }
}

/// Keeps `listener` running until the task is aborted. Failures back off
/// exponentially; a clean session end resets the backoff.
pub(crate) fn spawn_supervised_listener(
    listener: Arc<dyn Listener>,
    initial_backoff_secs: u64,
    max_backoff_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let component = listener.name().to_string();
        let initial_backoff = initial_backoff_secs.max(1);
        let max_backoff = max_backoff_secs.max(initial_backoff);
        let mut backoff = initial_backoff;

        loop {
            tracing::debug!(component, "listener starting");
            let result = listener.listen().await;
            let (delay, next) =
                restart_delay(result.is_err(), backoff, initial_backoff, max_backoff);
            match result {
                Ok(()) => {
                    tracing::info!(component, "listener session ended; reconnecting in {delay}s");
                }
                Err(e) => {
                    tracing::error!(component, "listener error: {e:#}; restarting in {delay}s");
                }
            }

            tokio::time::sleep(Duration::from_secs(delay)).await;
            backoff = next;
        }
    })
}

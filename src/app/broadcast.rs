//! Per-recipient fan-out of a submitted broadcast.

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{self, StreamExt};

use crate::error::SlackApiError;
use crate::form::submission::OutboundMessage;
use crate::transport::slack::SlackApi;

#[derive(Debug)]
pub struct Delivery {
    pub channel: String,
    pub ts: String,
}

#[derive(Debug)]
pub struct FailedSend {
    pub channel: String,
    pub error: SlackApiError,
}

/// Outcome of one broadcast. Order follows completion, not submission.
#[derive(Debug, Default)]
pub struct BroadcastReport {
    pub delivered: Vec<Delivery>,
    pub failed: Vec<FailedSend>,
}

impl BroadcastReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

type SendFuture<'a> =
    Pin<Box<dyn Future<Output = (&'a str, Result<String, SlackApiError>)> + Send + 'a>>;

fn post_one<'a>(api: &'a dyn SlackApi, message: &'a OutboundMessage) -> SendFuture<'a> {
    Box::pin(async move { (message.channel.as_str(), api.post_message(message).await) })
}

/// Posts every message independently, at most `max_concurrent` at a time.
///
/// A failed send is logged and recorded; it never stops the others and is
/// not retried.
pub async fn send_all(
    api: &dyn SlackApi,
    messages: &[OutboundMessage],
    max_concurrent: usize,
) -> BroadcastReport {
    // Collected before streaming so the returned future stays `Send`.
    let sends: Vec<SendFuture<'_>> = messages
        .iter()
        .map(|message| post_one(api, message))
        .collect();
    let results: Vec<(&str, Result<String, SlackApiError>)> = stream::iter(sends)
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let mut report = BroadcastReport::default();
    for (channel, result) in results {
        match result {
            Ok(ts) => {
                tracing::debug!(recipient = channel, %ts, "message delivered");
                report.delivered.push(Delivery {
                    channel: channel.to_string(),
                    ts,
                });
            }
            Err(error) => {
                tracing::warn!(recipient = channel, "message send failed: {error}");
                report.failed.push(FailedSend {
                    channel: channel.to_string(),
                    error,
                });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::slack::blocks::ModalView;
    use crate::transport::slack::{ApiFuture, AuthIdentity};
    use std::sync::{Arc, Mutex};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Fails for channels listed in `failing`, tracks peak concurrency.
    #[derive(Default)]
    struct FlakyApi {
        failing: Vec<&'static str>,
        posted: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SlackApi for FlakyApi {
        fn open_view<'a>(&'a self, _: &'a str, _: &'a ModalView) -> ApiFuture<'a, String> {
            Box::pin(async { Ok(String::new()) })
        }
        fn update_view<'a>(&'a self, _: &'a str, _: &'a str, _: &'a ModalView) -> ApiFuture<'a, ()> {
            Box::pin(async { Ok(()) })
        }
        fn push_view<'a>(&'a self, _: &'a str, _: &'a ModalView) -> ApiFuture<'a, String> {
            Box::pin(async { Ok(String::new()) })
        }
        fn post_message<'a>(&'a self, message: &'a OutboundMessage) -> ApiFuture<'a, String> {
            Box::pin(async move {
                let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);

                self.posted.lock().unwrap().push(message.channel.clone());
                if self.failing.contains(&message.channel.as_str()) {
                    Err(SlackApiError::Api {
                        method: "chat.postMessage",
                        error: "channel_not_found".into(),
                    })
                } else {
                    Ok(format!("ts-{}", message.channel))
                }
            })
        }
        fn auth_test(&self) -> ApiFuture<'_, AuthIdentity> {
            Box::pin(async {
                Ok(AuthIdentity {
                    user_id: "U0".into(),
                    user: None,
                    team: None,
                    bot_id: None,
                })
            })
        }
        fn open_socket_connection(&self) -> ApiFuture<'_, String> {
            Box::pin(async { Ok(String::new()) })
        }
    }

    fn message(channel: &str) -> OutboundMessage {
        OutboundMessage {
            channel: channel.into(),
            text: "Hello".into(),
            blocks: vec![],
            username: None,
            icon_url: None,
            cta_buttons: vec![],
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_rest() {
        let api = FlakyApi {
            failing: vec!["C2"],
            ..FlakyApi::default()
        };
        let messages = [message("C1"), message("C2"), message("C3")];

        let report = send_all(&api, &messages, 4).await;

        assert_eq!(report.attempted(), 3);
        assert_eq!(report.delivered.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].channel, "C2");
        assert!(!report.all_delivered());
        assert_eq!(api.posted.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let api = FlakyApi::default();
        let messages: Vec<OutboundMessage> =
            (0..8).map(|i| message(&format!("C{i}"))).collect();

        let report = send_all(&api, &messages, 2).await;

        assert!(report.all_delivered());
        assert_eq!(report.delivered.len(), 8);
        assert!(api.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn zero_limit_still_sends_sequentially() {
        let api = FlakyApi::default();
        let report = send_all(&api, &[message("C1"), message("C2")], 0).await;
        assert_eq!(report.delivered.len(), 2);
        assert_eq!(api.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn send_all_runs_on_a_spawned_task() {
        let api: Arc<dyn SlackApi> = Arc::new(FlakyApi::default());
        let messages = vec![message("C1"), message("C2")];

        let report = tokio::spawn(async move { send_all(api.as_ref(), &messages, 2).await })
            .await
            .unwrap();

        assert_eq!(report.delivered.len(), 2);
    }

    #[tokio::test]
    async fn no_messages_is_an_empty_report() {
        let api = FlakyApi::default();
        let report = send_all(&api, &[], 4).await;
        assert_eq!(report.attempted(), 0);
        assert!(report.all_delivered());
    }
}

use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::config::NotifyConfig;
use crate::db;
use crate::models::Decision;

pub mod handshake;

/// Ceiling on the delay between delivery retries.
const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(30);

/// Payload pushed to every registered callback URL when a game ends, and the
/// body the leaderboard's results endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub user: String,
    pub decision: Decision,
    pub guesses_used: i16,
}

/// Handle for queueing completion events onto the delivery worker.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<CompletionEvent>,
}

impl Notifier {
    /// Spawn the delivery worker and hand back its queue.
    pub fn spawn(db: PgPool, client: reqwest::Client, config: NotifyConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(delivery_loop(rx, db, client, config));
        Self { tx }
    }

    /// Queue an event for delivery. Never blocks and never fails the turn
    /// that produced it; if the worker is gone the event is logged and lost.
    pub fn dispatch(&self, event: CompletionEvent) {
        if self.tx.send(event).is_err() {
            tracing::error!("Delivery worker is gone, dropping completion event");
        }
    }
}

async fn delivery_loop(
    mut rx: mpsc::UnboundedReceiver<CompletionEvent>,
    db: PgPool,
    client: reqwest::Client,
    config: NotifyConfig,
) {
    while let Some(event) = rx.recv().await {
        // The registry is read per event so URLs registered mid-flight get
        // everything that finishes after them.
        let urls = match db::queries::callback_urls(&db).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::error!(
                    "Could not load callback urls, dropping completion event for {}: {}",
                    event.user,
                    e
                );
                continue;
            }
        };

        if urls.is_empty() {
            tracing::debug!("No callback urls registered, nothing to deliver");
            continue;
        }

        // One slow endpoint must not hold up the others.
        join_all(
            urls.iter()
                .map(|url| deliver_with_retry(&client, url, &event, &config)),
        )
        .await;
    }
}

async fn deliver_with_retry(
    client: &reqwest::Client,
    url: &str,
    event: &CompletionEvent,
    config: &NotifyConfig,
) {
    let mut delay = config.retry_backoff();
    for attempt in 1..=config.delivery_attempts {
        match deliver(client, url, event, config.delivery_timeout()).await {
            Ok(()) => {
                tracing::info!("Delivered completion event for {} to {}", event.user, url);
                return;
            }
            Err(e) if attempt < config.delivery_attempts => {
                tracing::warn!(
                    "Delivery to {} failed (attempt {}), retrying in {:?}: {}",
                    url,
                    attempt,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                delay = doubled(delay, MAX_RETRY_BACKOFF);
            }
            Err(e) => {
                tracing::error!(
                    "Giving up on completion event for {} to {} after {} attempts: {}",
                    event.user,
                    url,
                    attempt,
                    e
                );
            }
        }
    }
}

async fn deliver(
    client: &reqwest::Client,
    url: &str,
    event: &CompletionEvent,
    timeout: Duration,
) -> anyhow::Result<()> {
    let response = client.post(url).timeout(timeout).json(event).send().await?;
    if !response.status().is_success() {
        anyhow::bail!("endpoint returned {}", response.status());
    }
    Ok(())
}

/// Double a retry delay without passing the cap.
pub(crate) fn doubled(delay: Duration, cap: Duration) -> Duration {
    delay.saturating_mul(2).min(cap)
}

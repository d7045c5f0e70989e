//! Scheduled delivery of the daily question to every subscribed channel.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use daily_common::error::AppError;
use daily_common::types::{DeliveryFailure, DeliveryReport};
use daily_fetcher::QuestionSource;

use crate::messaging::MessagingClient;
use crate::registry::SubscriptionRegistry;

/// Fetches today's question once per cycle and fans it out to subscribers.
pub struct DailyNotifier {
    source: Arc<dyn QuestionSource>,
    messenger: Arc<dyn MessagingClient>,
    registry: Arc<SubscriptionRegistry>,
    interval: Duration,
}

impl DailyNotifier {
    pub fn new(
        source: Arc<dyn QuestionSource>,
        messenger: Arc<dyn MessagingClient>,
        registry: Arc<SubscriptionRegistry>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            messenger,
            registry,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one delivery cycle.
    ///
    /// A fetch failure aborts the cycle and is returned. Send failures are
    /// recorded per channel and do not stop delivery to the others.
    pub async fn run_once(&self) -> Result<DeliveryReport, AppError> {
        let started_at = Utc::now();
        let channels = self.registry.snapshot().await;

        if channels.is_empty() {
            tracing::debug!("No subscribed channels, skipping fetch");
            return Ok(DeliveryReport {
                started_at,
                attempted: 0,
                delivered: 0,
                failures: Vec::new(),
            });
        }

        let text = self.source.fetch_today().await?;

        let mut delivered = 0;
        let mut failures = Vec::new();
        for channel_id in &channels {
            match self.messenger.post_message(channel_id, &text).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        channel_id = %channel_id,
                        error = %e,
                        "Failed to deliver daily question"
                    );
                    failures.push(DeliveryFailure {
                        channel_id: channel_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(DeliveryReport {
            started_at,
            attempted: channels.len(),
            delivered,
            failures,
        })
    }

    /// Deliver immediately, then once per interval, until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Daily question notifier started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.run_once() => match result {
                    Ok(report) => tracing::info!(
                        attempted = report.attempted,
                        delivered = report.delivered,
                        failed = report.failed(),
                        "Daily question delivery cycle finished"
                    ),
                    Err(e) => tracing::error!(
                        error = %e,
                        "Daily question delivery cycle failed"
                    ),
                },
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("Daily question notifier stopped");
    }
}

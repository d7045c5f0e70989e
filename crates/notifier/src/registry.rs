//! Subscription registry — the in-memory subscription set plus its backing file.
//!
//! Every mutation is persisted before the lock is released, so the file and
//! the in-memory set never disagree for longer than one `subscribe` call.

use tokio::sync::Mutex;

use daily_common::error::AppError;
use daily_common::types::{ChannelId, SubscribeOutcome};

use crate::store::SubscriptionStore;

/// Ordered, duplicate-free set of channels that want the daily question.
pub struct SubscriptionRegistry {
    store: SubscriptionStore,
    channels: Mutex<Vec<ChannelId>>,
}

impl SubscriptionRegistry {
    /// Load the persisted set. Duplicate entries in the file are dropped.
    pub async fn load(store: SubscriptionStore) -> Result<Self, AppError> {
        let mut channels: Vec<ChannelId> = Vec::new();
        for id in store.load().await? {
            if !channels.contains(&id) {
                channels.push(id);
            }
        }

        tracing::info!(
            count = channels.len(),
            path = %store.path().display(),
            "Loaded daily question subscriptions"
        );
        for id in &channels {
            tracing::info!(channel_id = %id, "Channel subscribed to the daily question");
        }

        Ok(Self {
            store,
            channels: Mutex::new(channels),
        })
    }

    /// Add a channel and persist the set.
    ///
    /// If persisting fails the channel is removed again and the error returned.
    pub async fn subscribe(&self, channel_id: ChannelId) -> Result<SubscribeOutcome, AppError> {
        let mut channels = self.channels.lock().await;
        if channels.contains(&channel_id) {
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }

        channels.push(channel_id.clone());
        if let Err(e) = self.store.save(&channels).await {
            channels.pop();
            tracing::error!(channel_id = %channel_id, error = %e, "Failed to persist subscription");
            return Err(e);
        }

        tracing::info!(channel_id = %channel_id, total = channels.len(), "Channel subscribed");
        Ok(SubscribeOutcome::Subscribed)
    }

    /// Copy of the current set, in subscription order.
    pub async fn snapshot(&self) -> Vec<ChannelId> {
        self.channels.lock().await.clone()
    }

    pub async fn contains(&self, channel_id: &ChannelId) -> bool {
        self.channels.lock().await.contains(channel_id)
    }

    pub async fn len(&self) -> usize {
        self.channels.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.channels.lock().await.is_empty()
    }
}

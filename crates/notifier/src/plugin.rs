//! The daily question plugin: routes chat commands and owns the delivery loop.
//!
//! The delivery loop moves Idle → Running on the first event from a supported
//! platform and never restarts once it has been shut down.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use daily_common::config::{AppConfig, DEFAULT_QUERY_COMMAND, DEFAULT_SUBSCRIBE_COMMAND};
use daily_common::error::AppError;
use daily_common::types::{
    ChannelId, InboundEvent, PLUGIN_NAME, PluginInfo, PluginReply, SubscribeOutcome,
};
use daily_fetcher::QuestionSource;

use crate::messaging::MessagingClient;
use crate::registry::SubscriptionRegistry;
use crate::scheduler::DailyNotifier;

const SUBSCRIBED_REPLY: &str = "每日一题订阅成功！";
const ALREADY_SUBSCRIBED_REPLY: &str = "该频道已订阅每日一题！";
const NO_CHANNEL_REPLY: &str = "无法识别当前频道，订阅失败。";

/// Text commands the plugin answers to (matched against the trimmed message).
#[derive(Debug, Clone)]
pub struct PluginCommands {
    pub query: String,
    pub subscribe: String,
}

impl Default for PluginCommands {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY_COMMAND.to_string(),
            subscribe: DEFAULT_SUBSCRIBE_COMMAND.to_string(),
        }
    }
}

impl From<&AppConfig> for PluginCommands {
    fn from(config: &AppConfig) -> Self {
        Self {
            query: config.query_command.clone(),
            subscribe: config.subscribe_command.clone(),
        }
    }
}

/// Lifecycle of the background delivery loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierState {
    Idle,
    Running,
    Stopped,
}

enum LoopSlot {
    Idle,
    Running {
        cancel: CancellationToken,
        handle: JoinHandle<()>,
    },
    Stopped,
}

pub struct DailyQuestionPlugin {
    commands: PluginCommands,
    source: Arc<dyn QuestionSource>,
    registry: Arc<SubscriptionRegistry>,
    notifier: Arc<DailyNotifier>,
    slot: Mutex<LoopSlot>,
}

impl DailyQuestionPlugin {
    pub fn new(
        commands: PluginCommands,
        source: Arc<dyn QuestionSource>,
        messenger: Arc<dyn MessagingClient>,
        registry: Arc<SubscriptionRegistry>,
        interval: Duration,
    ) -> Self {
        let notifier = Arc::new(DailyNotifier::new(
            source.clone(),
            messenger,
            registry.clone(),
            interval,
        ));

        Self {
            commands,
            source,
            registry,
            notifier,
            slot: Mutex::new(LoopSlot::Idle),
        }
    }

    pub fn info(&self) -> PluginInfo {
        PluginInfo {
            name: PLUGIN_NAME.to_string(),
            desc: "LeetCode每日一题插件".to_string(),
            help: format!(
                "LeetCode每日一题插件, 回复『{}』即可触发, 回复『{}』为当前频道开启每日推送",
                self.commands.query, self.commands.subscribe
            ),
            version: format!("v{}", env!("CARGO_PKG_VERSION")),
            author: env!("CARGO_PKG_AUTHORS").to_string(),
        }
    }

    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }

    /// Route an inbound chat event. `None` means the event is not for this plugin.
    pub async fn handle(&self, event: &InboundEvent) -> Option<PluginReply> {
        if !event.platform.is_supported() {
            tracing::debug!(platform = %event.platform, "Ignoring event from unsupported platform");
            return None;
        }

        self.ensure_loop_started().await;

        let text = event.message.trim();
        if text == self.commands.query {
            Some(match self.get_today().await {
                Ok(question) => PluginReply::ok(question),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to fetch daily question on demand");
                    PluginReply::failed(format!("获取每日一题失败：{}", e))
                }
            })
        } else if text == self.commands.subscribe {
            Some(self.subscribe_reply(event.channel_id.as_ref()).await)
        } else {
            None
        }
    }

    /// Fetch today's question right now.
    pub async fn get_today(&self) -> Result<String, AppError> {
        self.source.fetch_today().await
    }

    pub async fn subscribe(&self, channel_id: ChannelId) -> Result<SubscribeOutcome, AppError> {
        self.registry.subscribe(channel_id).await
    }

    async fn subscribe_reply(&self, channel_id: Option<&ChannelId>) -> PluginReply {
        let Some(channel_id) = channel_id else {
            return PluginReply::failed(NO_CHANNEL_REPLY);
        };

        match self.subscribe(channel_id.clone()).await {
            Ok(SubscribeOutcome::Subscribed) => PluginReply::ok(SUBSCRIBED_REPLY),
            Ok(SubscribeOutcome::AlreadySubscribed) => PluginReply::failed(ALREADY_SUBSCRIBED_REPLY),
            Err(e) => PluginReply::failed(format!("订阅失败：{}", e)),
        }
    }

    /// Spawn the delivery loop if it has never run. Returns `true` if this call started it.
    pub async fn ensure_loop_started(&self) -> bool {
        let mut slot = self.slot.lock().await;
        if !matches!(*slot, LoopSlot::Idle) {
            return false;
        }

        let cancel = CancellationToken::new();
        let notifier = self.notifier.clone();
        let token = cancel.clone();
        let handle = tokio::spawn(async move { notifier.run(token).await });

        tracing::info!(
            interval_secs = self.notifier.interval().as_secs(),
            "Started daily question delivery loop"
        );
        *slot = LoopSlot::Running { cancel, handle };
        true
    }

    pub async fn state(&self) -> NotifierState {
        match *self.slot.lock().await {
            LoopSlot::Idle => NotifierState::Idle,
            LoopSlot::Running { .. } => NotifierState::Running,
            LoopSlot::Stopped => NotifierState::Stopped,
        }
    }

    /// Cancel the delivery loop and wait for it to finish.
    pub async fn shutdown(&self) {
        let mut slot = self.slot.lock().await;
        if let LoopSlot::Running { cancel, handle } = std::mem::replace(&mut *slot, LoopSlot::Stopped)
        {
            cancel.cancel();
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Delivery loop ended abnormally");
            }
        }
    }
}

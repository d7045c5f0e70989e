use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// Default upstream for the daily question GraphQL API.
pub const DEFAULT_LEETCODE_BASE_URL: &str = "https://leetcode.cn";

/// Command that replies with today's question.
pub const DEFAULT_QUERY_COMMAND: &str = "每日一题";

/// Command that subscribes the current channel to daily delivery.
pub const DEFAULT_SUBSCRIBE_COMMAND: &str = "开启每日一题";

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the question service (GraphQL lives at `{base}/graphql`)
    pub leetcode_base_url: String,

    /// Per-request timeout for the question service, in seconds
    pub leetcode_timeout_secs: u64,

    /// JSON file holding the subscribed channel ids
    pub subscriptions_path: PathBuf,

    /// Seconds between scheduled deliveries (default: 86400 = 24h)
    pub delivery_interval_secs: u64,

    /// Base URL of the host messaging API
    pub host_api_url: String,

    /// Bot credential sent as `Authorization: Bot <token>`
    pub host_bot_token: Option<String>,

    /// Text command that returns today's question
    pub query_command: String,

    /// Text command that subscribes a channel
    pub subscribe_command: String,

    /// Address the HTTP adapter listens on
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let positive_secs = |key: &str, default: &str| -> Result<u64, AppError> {
            let secs: u64 = var(key, default)
                .parse()
                .map_err(|_| AppError::Config(format!("{} must be a valid u64", key)))?;
            if secs == 0 {
                return Err(AppError::Config(format!("{} must be greater than zero", key)));
            }
            Ok(secs)
        };

        Ok(Self {
            leetcode_base_url: var("LEETCODE_BASE_URL", DEFAULT_LEETCODE_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            leetcode_timeout_secs: positive_secs("LEETCODE_TIMEOUT_SECS", "15")?,
            subscriptions_path: PathBuf::from(var(
                "SUBSCRIPTIONS_PATH",
                "data/leetcode_subscriptions.json",
            )),
            delivery_interval_secs: positive_secs("DELIVERY_INTERVAL_SECS", "86400")?,
            host_api_url: lookup("HOST_API_URL")
                .ok_or_else(|| {
                    AppError::Config("HOST_API_URL environment variable is required".to_string())
                })?
                .trim_end_matches('/')
                .to_string(),
            host_bot_token: lookup("HOST_BOT_TOKEN").filter(|t| !t.is_empty()),
            query_command: var("QUERY_COMMAND", DEFAULT_QUERY_COMMAND),
            subscribe_command: var("SUBSCRIBE_COMMAND", DEFAULT_SUBSCRIBE_COMMAND),
            bind_addr: var("BIND_ADDR", "0.0.0.0:3000")
                .parse()
                .map_err(|_| AppError::Config("BIND_ADDR must be a socket address".to_string()))?,
        })
    }

    pub fn leetcode_timeout(&self) -> Duration {
        Duration::from_secs(self.leetcode_timeout_secs)
    }

    pub fn delivery_interval(&self) -> Duration {
        Duration::from_secs(self.delivery_interval_secs)
    }
}

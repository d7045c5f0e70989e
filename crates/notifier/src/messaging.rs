//! Outbound messaging to the host platform.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;

use daily_common::error::AppError;
use daily_common::types::ChannelId;

/// Host-provided "post message" capability.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    async fn post_message(&self, channel_id: &ChannelId, content: &str) -> Result<(), AppError>;
}

#[derive(Serialize)]
struct PostMessageBody<'a> {
    content: &'a str,
}

/// Posts messages through the host's HTTP API at
/// `{base_url}/channels/{channel_id}/messages`.
///
/// The channel id is percent-encoded as a single path segment.
#[derive(Clone)]
pub struct HttpMessagingClient {
    http: reqwest::Client,
    base_url: Url,
    bot_token: Option<String>,
}

impl HttpMessagingClient {
    pub fn new(base_url: &str, bot_token: Option<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid host API URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "host API URL {} cannot carry a path",
                base_url
            )));
        }

        Ok(Self {
            http,
            base_url,
            bot_token,
        })
    }

    fn message_url(&self, channel_id: &ChannelId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("channels")
                .push(channel_id.as_str())
                .push("messages");
        }
        url
    }
}

#[async_trait]
impl MessagingClient for HttpMessagingClient {
    async fn post_message(&self, channel_id: &ChannelId, content: &str) -> Result<(), AppError> {
        let mut request = self
            .http
            .post(self.message_url(channel_id))
            .json(&PostMessageBody { content });
        if let Some(token) = &self.bot_token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Bot {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Messaging(format!(
                "posting to channel {} failed with {}: {}",
                channel_id, status, body
            )));
        }

        tracing::debug!(channel_id = %channel_id, "Message posted");
        Ok(())
    }
}

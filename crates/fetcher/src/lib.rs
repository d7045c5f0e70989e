//! Daily question fetcher.
//!
//! Talks to the question service's GraphQL endpoint and renders today's
//! question as plain chat text.

pub mod client;
pub mod graphql;
pub mod render;

use async_trait::async_trait;

use daily_common::error::AppError;

pub use client::QuestionClient;

/// Anything that can produce today's question as ready-to-send text.
///
/// Errors are returned as-is; implementations do not retry.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_today(&self) -> Result<String, AppError>;
}

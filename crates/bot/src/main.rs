//! Daily question bot binary entrypoint.

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use daily_common::config::AppConfig;
use daily_fetcher::QuestionClient;
use daily_notifier::{
    DailyQuestionPlugin, HttpMessagingClient, PluginCommands, SubscriptionRegistry,
    SubscriptionStore,
};

use daily_bot::routes::create_router;
use daily_bot::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "daily_bot=info,daily_notifier=info,daily_fetcher=info,tower_http=info",
            )
        }))
        .json()
        .init();

    tracing::info!("Daily question bot starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Load subscriptions
    let store = SubscriptionStore::new(config.subscriptions_path.clone());
    let registry = Arc::new(SubscriptionRegistry::load(store).await?);

    // Build clients
    let source = Arc::new(QuestionClient::new(
        &config.leetcode_base_url,
        config.leetcode_timeout(),
    )?);
    let messenger = Arc::new(HttpMessagingClient::new(
        &config.host_api_url,
        config.host_bot_token.clone(),
    )?);

    let plugin = Arc::new(DailyQuestionPlugin::new(
        PluginCommands::from(&config),
        source,
        messenger,
        registry,
        config.delivery_interval(),
    ));

    let app = create_router(AppState::new(plugin.clone())).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Event endpoint listening");

    // Run with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    plugin.shutdown().await;
    tracing::info!("Daily question bot stopped.");
    Ok(())
}

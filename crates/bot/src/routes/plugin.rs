//! Plugin metadata, on-demand question and subscription lookups.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use daily_common::error::AppError;
use daily_common::types::{ChannelId, PluginInfo};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/plugin/info", get(plugin_info))
        .route("/api/today", get(today))
        .route("/api/subscriptions", get(list_subscriptions))
        .route("/api/subscriptions/{channel_id}", get(get_subscription))
}

/// Rendered daily question.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub question: String,
}

/// GET /api/plugin/info — Name, description and usage help.
async fn plugin_info(State(state): State<AppState>) -> Json<PluginInfo> {
    Json(state.plugin.info())
}

/// GET /api/today — Today's question, fetched from the question service.
async fn today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let question = state.plugin.get_today().await?;
    Ok(Json(TodayResponse { question }))
}

/// GET /api/subscriptions — Channels receiving the daily question.
async fn list_subscriptions(State(state): State<AppState>) -> Json<Vec<ChannelId>> {
    Json(state.plugin.registry().snapshot().await)
}

/// GET /api/subscriptions/{channel_id} — Whether one channel is subscribed.
async fn get_subscription(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let channel_id = ChannelId::new(channel_id);
    if state.plugin.registry().contains(&channel_id).await {
        Ok(Json(serde_json::json!({"channel_id": channel_id, "subscribed": true})))
    } else {
        Err(AppError::NotFound(format!(
            "Channel {} is not subscribed",
            channel_id
        )))
    }
}

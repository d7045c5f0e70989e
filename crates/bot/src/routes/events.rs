//! Inbound chat events from the host.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use daily_common::error::AppError;
use daily_common::types::{InboundEvent, PluginReply};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/events", post(handle_event))
}

/// Whether the plugin took the event, and what to send back if so.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventResponse {
    pub handled: bool,
    pub reply: Option<PluginReply>,
}

/// POST /api/events — Route a chat message through the plugin.
async fn handle_event(
    State(state): State<AppState>,
    Json(event): Json<InboundEvent>,
) -> Result<Json<EventResponse>, AppError> {
    if event.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let reply = state.plugin.handle(&event).await;

    if let Some(reply) = &reply {
        tracing::info!(
            platform = %event.platform,
            channel_id = ?event.channel_id,
            success = reply.success,
            "Handled chat command"
        );
    }

    Ok(Json(EventResponse {
        handled: reply.is_some(),
        reply,
    }))
}

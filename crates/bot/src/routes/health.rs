//! Health check endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use daily_notifier::NotifierState;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let notifier = match state.plugin.state().await {
        NotifierState::Idle => "idle",
        NotifierState::Running => "running",
        NotifierState::Stopped => "stopped",
    };

    Json(json!({
        "status": "ok",
        "service": "daily-bot",
        "version": env!("CARGO_PKG_VERSION"),
        "notifier": notifier,
    }))
}

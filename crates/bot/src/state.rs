//! Shared application state for the Axum server.

use std::sync::Arc;

use daily_notifier::DailyQuestionPlugin;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub plugin: Arc<DailyQuestionPlugin>,
}

impl AppState {
    pub fn new(plugin: Arc<DailyQuestionPlugin>) -> Self {
        Self { plugin }
    }
}

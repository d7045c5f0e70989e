//! HTTP adapter exposing the daily question plugin to a chat-bot host.
//!
//! Endpoints:
//! - POST /api/events — deliver an inbound chat message to the plugin
//! - GET  /api/plugin/info — plugin metadata for the host's help command
//! - GET  /api/subscriptions — channels subscribed to daily delivery
//! - GET  /health

pub mod routes;
pub mod state;

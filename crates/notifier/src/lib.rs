//! Daily question subscriptions and delivery.
//!
//! - `store` / `registry`: the persisted, duplicate-free channel set
//! - `messaging`: posting text to a host channel
//! - `scheduler`: the fetch-and-fan-out loop
//! - `plugin`: chat command routing and loop lifecycle

pub mod messaging;
pub mod plugin;
pub mod registry;
pub mod scheduler;
pub mod store;

pub use messaging::{HttpMessagingClient, MessagingClient};
pub use plugin::{DailyQuestionPlugin, NotifierState, PluginCommands};
pub use registry::SubscriptionRegistry;
pub use scheduler::DailyNotifier;
pub use store::SubscriptionStore;

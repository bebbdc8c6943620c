//! RG Service Telegram Bot
//!
//! A Telegram bot that takes home-service requests: the user picks a service
//! category, answers a short form (name, phone, address, comment), confirms,
//! and the request is forwarded to the staff chats.

pub mod config;
pub mod handlers;
pub mod health;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{BotError, Result};

// Re-export main components for easy access
pub use services::{NotificationDispatcher, ServiceFactory};
pub use state::{IntakeFlow, StateStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}

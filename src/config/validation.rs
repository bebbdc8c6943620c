//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use std::collections::HashSet;

use crate::models::{CONFIRM_CODE, EDIT_CODE};
use crate::utils::errors::{BotError, Result};
use super::Settings;

/// Longest accepted conversation TTL: one year
pub const MAX_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_notifications_config(&settings.notifications)?;
    validate_state_config(&settings.state)?;
    validate_logging_config(&settings.logging)?;
    validate_categories(&settings.categories)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.trim().is_empty() {
        return Err(BotError::Config(
            "Bot token is required (set BOT_TOKEN)".to_string()
        ));
    }

    if let Some(api_url) = &config.api_url {
        url::Url::parse(api_url).map_err(|e| {
            BotError::Config(format!("Invalid Bot API URL '{}': {}", api_url, e))
        })?;
    }

    Ok(())
}

/// Validate notification destinations
///
/// Unset chat ids are allowed; they are reported as skipped on every submission.
fn validate_notifications_config(config: &super::NotificationsConfig) -> Result<()> {
    let mut names = HashSet::new();
    for destination in &config.destinations {
        if destination.name.trim().is_empty() {
            return Err(BotError::Config(
                "Destination name cannot be empty".to_string()
            ));
        }
        if !names.insert(destination.name.as_str()) {
            return Err(BotError::Config(
                format!("Duplicate destination name: {}", destination.name)
            ));
        }
    }

    Ok(())
}

/// Validate conversation state configuration
fn validate_state_config(config: &super::StateConfig) -> Result<()> {
    if config.ttl_seconds == 0 {
        return Err(BotError::Config(
            "Conversation TTL must be greater than 0".to_string()
        ));
    }

    if config.ttl_seconds > MAX_TTL_SECONDS {
        return Err(BotError::Config(format!(
            "Conversation TTL must not exceed {} seconds",
            MAX_TTL_SECONDS
        )));
    }

    if config.cleanup_interval_seconds == 0 {
        return Err(BotError::Config(
            "Cleanup interval must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(BotError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(BotError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

/// Validate the category menu
fn validate_categories(categories: &[super::CategoryConfig]) -> Result<()> {
    if categories.is_empty() {
        return Err(BotError::Config(
            "At least one service category must be configured".to_string()
        ));
    }

    let mut codes = HashSet::new();
    for category in categories {
        if category.label.trim().is_empty() || category.code.trim().is_empty() {
            return Err(BotError::Config(
                "Category label and code cannot be empty".to_string()
            ));
        }
        // Telegram limits callback data to 64 bytes
        if category.code.len() > 64 {
            return Err(BotError::Config(
                format!("Category code too long: {}", category.code)
            ));
        }
        if category.code == CONFIRM_CODE || category.code == EDIT_CODE {
            return Err(BotError::Config(
                format!("Category code is reserved: {}", category.code)
            ));
        }
        if !codes.insert(category.code.as_str()) {
            return Err(BotError::Config(
                format!("Duplicate category code: {}", category.code)
            ));
        }
    }

    Ok(())
}

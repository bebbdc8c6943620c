//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from configuration files and environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{Category, CategoryMenu};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub notifications: NotificationsConfig,
    pub health: HealthConfig,
    pub state: StateConfig,
    pub logging: LoggingConfig,
    pub categories: Vec<CategoryConfig>,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    /// Alternative Bot API server, e.g. a self-hosted one
    pub api_url: Option<String>,
}

/// Destinations that receive confirmed submissions
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationsConfig {
    pub destinations: Vec<DestinationConfig>,
}

/// A single staff destination; an unset chat id is skipped at delivery time
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DestinationConfig {
    pub name: String,
    pub chat_id: Option<String>,
}

/// Health-check listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

/// Conversation state configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StateConfig {
    pub ttl_seconds: u64,
    pub cleanup_interval_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    /// Directory for the daily-rolling log file; stdout only when unset
    pub file_path: Option<String>,
}

/// A service category offered in the start menu
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CategoryConfig {
    pub label: String,
    pub code: String,
}

pub const STAFF_GROUP_DESTINATION: &str = "staff_group";
pub const ADMIN_DESTINATION: &str = "admin";

impl Settings {
    /// Load settings from an optional `config` file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load settings from an explicit configuration file
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = config::Config::try_from(&Settings::default())?;

        let mut builder = config::Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("RGBOT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        // Plain variables used by existing deployments
        builder = builder.set_override_option("bot.token", non_empty_env("BOT_TOKEN"))?;
        if let Some(port) = non_empty_env("PORT") {
            builder = builder.set_override("health.port", port)?;
        }

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.apply_legacy_destinations(non_empty_env("GROUP_ID"), non_empty_env("ADMIN_ID"));
        Ok(settings)
    }

    /// `GROUP_ID` and `ADMIN_ID` fill the matching destinations, adding them if absent
    fn apply_legacy_destinations(&mut self, group_id: Option<String>, admin_id: Option<String>) {
        for (name, chat_id) in [(STAFF_GROUP_DESTINATION, group_id), (ADMIN_DESTINATION, admin_id)] {
            let Some(chat_id) = chat_id else { continue };
            match self.notifications.destinations.iter_mut().find(|d| d.name == name) {
                Some(destination) => destination.chat_id = Some(chat_id),
                None => self.notifications.destinations.push(DestinationConfig {
                    name: name.to_string(),
                    chat_id: Some(chat_id),
                }),
            }
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::BotError> {
        super::validation::validate_settings(self)
    }

    /// Build the read-only category menu shown to users
    pub fn category_menu(&self) -> CategoryMenu {
        CategoryMenu::new(
            self.categories
                .iter()
                .map(|c| Category::new(c.label.clone(), c.code.clone()))
                .collect(),
        )
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                api_url: None,
            },
            notifications: NotificationsConfig {
                destinations: vec![
                    DestinationConfig {
                        name: STAFF_GROUP_DESTINATION.to_string(),
                        chat_id: None,
                    },
                    DestinationConfig {
                        name: ADMIN_DESTINATION.to_string(),
                        chat_id: None,
                    },
                ],
            },
            health: HealthConfig {
                enabled: true,
                host: "0.0.0.0".to_string(),
                port: 10000,
            },
            state: StateConfig {
                ttl_seconds: 86400,
                cleanup_interval_seconds: 600,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
                file_path: None,
            },
            categories: CategoryMenu::default()
                .iter()
                .map(|c| CategoryConfig {
                    label: c.label.clone(),
                    code: c.code.clone(),
                })
                .collect(),
        }
    }
}

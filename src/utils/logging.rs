//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the bot.

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::utils::errors::{BotError, Result};
use crate::utils::helpers::truncate_text;

/// Initialize logging based on configuration.
///
/// Returns the file appender guard when file logging is enabled; the caller
/// must keep it alive for the lifetime of the process or buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| BotError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .boxed()
    };

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "rg-service-bot.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| BotError::Config(format!("Failed to install logger: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    let details = details.map(|d| truncate_text(d, 64));
    info!(
        user_id = user_id,
        action = action,
        details = details.as_deref(),
        "User action performed"
    );
}

/// Log a confirmed submission
pub fn log_submission(submission_id: &str, user_id: i64, category: &str) {
    info!(
        submission_id = submission_id,
        user_id = user_id,
        category = category,
        "Submission confirmed"
    );
}

/// Log the outcome of a single delivery attempt
pub fn log_delivery_outcome(submission_id: &str, destination: &str, outcome: &str, reason: Option<&str>) {
    match reason {
        Some(reason) => warn!(
            submission_id = submission_id,
            destination = destination,
            outcome = outcome,
            reason = reason,
            "Submission delivery did not succeed"
        ),
        None => debug!(
            submission_id = submission_id,
            destination = destination,
            outcome = outcome,
            "Submission delivery attempt finished"
        ),
    }
}

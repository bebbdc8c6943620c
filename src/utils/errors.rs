//! Error handling for the RG Service bot
//!
//! This module defines the main error types used throughout the application.
//! User input mistakes are never errors here: the intake flow answers them
//! with a re-prompt. Delivery failures are captured per destination in the
//! dispatcher report.

use thiserror::Error;

/// Main error type for the bot
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Per-destination delivery errors
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("destination is not configured")]
    Unconfigured,

    #[error("invalid chat id: {0}")]
    InvalidChatId(String),

    #[error("{0}")]
    Transport(#[from] teloxide::RequestError),
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

/// Result type alias for delivery operations
pub type DeliveryResult<T> = std::result::Result<T, DeliveryError>;

impl BotError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            BotError::Telegram(_) => true,
            BotError::Config(_) => false,
            BotError::Io(_) => true,
            BotError::InvalidInput(_) => false,
            BotError::Delivery(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BotError::Config(_) => ErrorSeverity::Critical,
            BotError::Delivery(_) => ErrorSeverity::Warning,
            BotError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_fatal() {
        let err = BotError::Config("Bot token is required".to_string());
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.to_string(), "Configuration error: Bot token is required");
    }

    #[test]
    fn test_delivery_error_display() {
        let err = BotError::from(DeliveryError::InvalidChatId("@staff".to_string()));
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.to_string(), "Delivery error: invalid chat id: @staff");
    }
}

//! Conversation context management
//!
//! This module tracks where each user is in the request form and the answers
//! collected so far.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Position of a conversation in the fixed field-collection sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Stage {
    #[default]
    AwaitingCategory,
    AwaitingName,
    AwaitingPhone,
    AwaitingAddress,
    AwaitingComment,
    AwaitingConfirmation,
}

impl Stage {
    /// Free-text field requested at this stage, if any
    pub fn text_field(self) -> Option<Field> {
        match self {
            Stage::AwaitingName => Some(Field::Name),
            Stage::AwaitingPhone => Some(Field::Phone),
            Stage::AwaitingAddress => Some(Field::Address),
            Stage::AwaitingComment => Some(Field::Comment),
            Stage::AwaitingCategory | Stage::AwaitingConfirmation => None,
        }
    }

    /// Stage that follows this one once its answer is stored
    pub fn next(self) -> Stage {
        match self {
            Stage::AwaitingCategory => Stage::AwaitingName,
            Stage::AwaitingName => Stage::AwaitingPhone,
            Stage::AwaitingPhone => Stage::AwaitingAddress,
            Stage::AwaitingAddress => Stage::AwaitingComment,
            Stage::AwaitingComment => Stage::AwaitingConfirmation,
            Stage::AwaitingConfirmation => Stage::AwaitingConfirmation,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::AwaitingCategory => "awaiting_category",
            Stage::AwaitingName => "awaiting_name",
            Stage::AwaitingPhone => "awaiting_phone",
            Stage::AwaitingAddress => "awaiting_address",
            Stage::AwaitingComment => "awaiting_comment",
            Stage::AwaitingConfirmation => "awaiting_confirmation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers collected by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Category,
    Name,
    Phone,
    Address,
    Comment,
}

/// User conversation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// User ID this context belongs to
    pub user_id: i64,
    /// Next thing the bot is waiting for
    pub stage: Stage,
    /// Answers supplied so far; absent until given
    pub fields: HashMap<Field, String>,
    /// Last known Telegram username of the user
    pub username: Option<String>,
    /// When this context expires (for cleanup)
    pub expires_at: Option<DateTime<Utc>>,
    /// When this context was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Create a new conversation context for a user
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            stage: Stage::AwaitingCategory,
            fields: HashMap::new(),
            username: None,
            expires_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Back to the start with nothing collected
    pub fn reset(&mut self) {
        self.stage = Stage::AwaitingCategory;
        self.fields.clear();
        self.touch();
    }

    /// Drop every answer except the category and ask for the name again
    pub fn clear_answers(&mut self) {
        self.fields.retain(|field, _| *field == Field::Category);
        self.stage = Stage::AwaitingName;
        self.touch();
    }

    /// Store an answer
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.fields.insert(field, value.into());
        self.touch();
    }

    /// Get an answer
    pub fn field(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Move to the given stage
    pub fn advance_to(&mut self, stage: Stage) {
        self.stage = stage;
        self.touch();
    }

    /// Check whether the conversation is at its initial stage with no answers
    pub fn is_initial(&self) -> bool {
        self.stage == Stage::AwaitingCategory && self.fields.is_empty()
    }

    /// Set expiry time
    pub fn set_expiry(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = Some(expires_at);
    }

    /// Push the expiry forward from now
    pub fn extend_expiry(&mut self, ttl: Duration) {
        self.expires_at = Some(Utc::now() + ttl);
    }

    /// Check if context has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check if context had expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

//! Inbound event model

use serde::{Deserialize, Serialize};

/// Origin of an inbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Inline button press; payload is the callback code
    Selection,
    /// Typed message; payload is the raw text
    Text,
    /// Bot command; payload is the command name without the slash
    Command,
}

/// Something a user did, as seen by the intake flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub user_id: i64,
    pub username: Option<String>,
    pub kind: InputKind,
    pub payload: String,
}

impl InboundEvent {
    pub fn selection(user_id: i64, code: impl Into<String>) -> Self {
        Self::new(user_id, InputKind::Selection, code)
    }

    pub fn text(user_id: i64, text: impl Into<String>) -> Self {
        Self::new(user_id, InputKind::Text, text)
    }

    pub fn command(user_id: i64, command: impl Into<String>) -> Self {
        Self::new(user_id, InputKind::Command, command)
    }

    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    fn new(user_id: i64, kind: InputKind, payload: impl Into<String>) -> Self {
        Self {
            user_id,
            username: None,
            kind,
            payload: payload.into(),
        }
    }
}

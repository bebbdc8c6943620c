//! Outbound prompt model
//!
//! Prompts are produced by the intake flow and rendered by the transport.
//! Text is Telegram HTML; anything typed by a user is escaped before it
//! ends up here.

use serde::{Deserialize, Serialize};

/// Callback code of the "send" button on the confirmation step
pub const CONFIRM_CODE: &str = "confirm_send";
/// Callback code of the "edit" button on the confirmation step
pub const EDIT_CODE: &str = "edit_start";

/// A button offered together with a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub code: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            code: code.into(),
        }
    }
}

/// How buttons are arranged under a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChoiceLayout {
    /// One button per row
    #[default]
    Column,
    /// All buttons on a single row
    Row,
}

/// Message the bot sends next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    pub choices: Option<Vec<Choice>>,
    pub layout: ChoiceLayout,
}

impl Prompt {
    /// Plain prompt without buttons
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: None,
            layout: ChoiceLayout::Column,
        }
    }

    /// Prompt with one button per row
    pub fn with_choices(text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            text: text.into(),
            choices: Some(choices),
            layout: ChoiceLayout::Column,
        }
    }

    /// Prompt with all buttons side by side
    pub fn with_choice_row(text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            layout: ChoiceLayout::Row,
            ..Self::with_choices(text, choices)
        }
    }

    /// Codes of the offered buttons, empty when there are none
    pub fn choice_codes(&self) -> Vec<&str> {
        self.choices
            .iter()
            .flatten()
            .map(|c| c.code.as_str())
            .collect()
    }
}

//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod category;
pub mod event;
pub mod prompt;
pub mod submission;
pub mod user;

// Re-export commonly used models
pub use category::{Category, CategoryMenu};
pub use event::{InboundEvent, InputKind};
pub use prompt::{Choice, ChoiceLayout, Prompt, CONFIRM_CODE, EDIT_CODE};
pub use submission::SubmissionRecord;
pub use user::Sender;

//! State management module
//!
//! This module handles conversation state and the request intake flow

pub mod context;
pub mod intake;
pub mod storage;

// Re-export commonly used state components
pub use context::{ConversationContext, Field, Stage};
pub use intake::{FlowAction, FlowCommand, IntakeFlow, SideEffect, Transition};
pub use storage::{StateStorage, StateStorageManager, StorageStats};

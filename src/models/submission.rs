//! Submission record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Sender;

/// Immutable snapshot of a user's answers, taken when they confirm.
///
/// Handed to the notification dispatcher once and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub category: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub comment: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
}

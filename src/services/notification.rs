//! Notification dispatcher
//!
//! Fans a confirmed submission out to every configured staff destination.
//! Destinations are independent: an unset chat id is skipped, a bad chat id
//! or a Telegram error marks that destination as failed, and neither stops
//! delivery to the others. Nothing is retried.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use teloxide::{
    payloads::SendMessageSetters,
    requests::Requester,
    types::{ChatId, ParseMode},
    Bot,
};
use tracing::info;
use uuid::Uuid;

use crate::config::NotificationsConfig;
use crate::models::SubmissionRecord;
use crate::utils::errors::{DeliveryError, DeliveryResult};
use crate::utils::helpers::parse_chat_id;
use crate::utils::logging::log_delivery_outcome;
use super::templates;

/// A configured recipient of submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub name: String,
    pub chat_id: Option<String>,
}

/// What happened to one destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeliveryStatus {
    Delivered,
    Skipped,
    Failed { reason: String },
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Skipped => "skipped",
            DeliveryStatus::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub destination: String,
    #[serde(flatten)]
    pub status: DeliveryStatus,
}

/// Per-destination results of one dispatch, in configuration order
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    pub submission_id: Uuid,
    pub outcomes: Vec<DeliveryOutcome>,
    /// Text for the submitting user; present whatever happened to staff delivery
    pub acknowledgment: String,
}

impl DeliveryReport {
    pub fn delivered_count(&self) -> usize {
        self.count(|s| matches!(s, DeliveryStatus::Delivered))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|s| matches!(s, DeliveryStatus::Skipped))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, DeliveryStatus::Failed { .. }))
    }

    /// True when no destination received the submission
    pub fn nothing_delivered(&self) -> bool {
        self.delivered_count() == 0
    }

    pub fn outcome(&self, destination: &str) -> Option<&DeliveryStatus> {
        self.outcomes
            .iter()
            .find(|o| o.destination == destination)
            .map(|o| &o.status)
    }

    fn count(&self, predicate: impl Fn(&DeliveryStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(&o.status)).count()
    }
}

/// Sends submission summaries to staff chats
#[derive(Clone)]
pub struct NotificationDispatcher {
    bot: Bot,
    destinations: Arc<[Destination]>,
}

impl NotificationDispatcher {
    /// Create a new dispatcher for the configured destinations
    pub fn new(bot: Bot, config: &NotificationsConfig) -> Self {
        let destinations: Vec<Destination> = config
            .destinations
            .iter()
            .map(|d| Destination {
                name: d.name.clone(),
                chat_id: d.chat_id.clone(),
            })
            .collect();

        Self {
            bot,
            destinations: destinations.into(),
        }
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Deliver a submission to every destination concurrently
    pub async fn dispatch(&self, record: &SubmissionRecord) -> DeliveryReport {
        let summary = templates::format_summary(record);
        let submission_id = record.id.to_string();

        let attempts = self.destinations.iter().map(|destination| {
            let summary = &summary;
            let submission_id = &submission_id;
            async move {
                let status = match self.send_summary(destination, summary).await {
                    Ok(()) => DeliveryStatus::Delivered,
                    Err(DeliveryError::Unconfigured) => DeliveryStatus::Skipped,
                    Err(e) => DeliveryStatus::Failed {
                        reason: e.to_string(),
                    },
                };

                let reason = match &status {
                    DeliveryStatus::Failed { reason } => Some(reason.as_str()),
                    _ => None,
                };
                log_delivery_outcome(submission_id, &destination.name, status.as_str(), reason);

                DeliveryOutcome {
                    destination: destination.name.clone(),
                    status,
                }
            }
        });

        let outcomes = join_all(attempts).await;
        let report = DeliveryReport {
            submission_id: record.id,
            outcomes,
            acknowledgment: templates::ACKNOWLEDGMENT.to_string(),
        };

        info!(
            submission_id = %record.id,
            delivered = report.delivered_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            "Submission dispatch completed"
        );
        report
    }

    async fn send_summary(&self, destination: &Destination, summary: &str) -> DeliveryResult<()> {
        let raw = destination
            .chat_id
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(DeliveryError::Unconfigured)?;

        let chat_id = parse_chat_id(raw).ok_or_else(|| DeliveryError::InvalidChatId(raw.to_string()))?;

        self.bot
            .send_message(ChatId(chat_id), summary)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("destinations", &self.destinations)
            .finish_non_exhaustive()
    }
}

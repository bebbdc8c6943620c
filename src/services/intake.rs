//! Intake service
//!
//! Binds the intake flow to the per-user state storage: load (or create) the
//! user's context, apply the event, then store the result. Each user's
//! context only changes through that user's own events.

use chrono::Utc;
use tracing::debug;

use crate::models::InboundEvent;
use crate::state::{ConversationContext, FlowAction, IntakeFlow, StateStorage, Transition};
use crate::utils::logging::{log_submission, log_user_action};

#[derive(Debug, Clone)]
pub struct IntakeService {
    flow: IntakeFlow,
    storage: StateStorage,
}

impl IntakeService {
    pub fn new(flow: IntakeFlow, storage: StateStorage) -> Self {
        Self { flow, storage }
    }

    pub fn flow(&self) -> &IntakeFlow {
        &self.flow
    }

    pub fn storage(&self) -> &StateStorage {
        &self.storage
    }

    /// Feed one event from a user into their conversation
    pub async fn advance(&self, event: &InboundEvent) -> Transition {
        let mut context = self
            .storage
            .load_context(event.user_id)
            .await
            .unwrap_or_else(|| ConversationContext::new(event.user_id));

        let from = context.stage;
        let transition = self.flow.advance(&mut context, event, Utc::now());

        debug!(
            user_id = event.user_id,
            from = %from,
            to = %context.stage,
            action = ?transition.action,
            "Intake transition"
        );

        match transition.action {
            FlowAction::Submitted | FlowAction::Cancelled => {
                self.storage.delete_context(event.user_id).await;
            }
            _ => self.storage.save_context(&context).await,
        }

        match (&transition.action, transition.submission()) {
            (FlowAction::Submitted, Some(record)) => {
                log_submission(&record.id.to_string(), event.user_id, &record.category);
            }
            (FlowAction::Reprompted, _) => {}
            (action, _) => log_user_action(event.user_id, &format!("{:?}", action), Some(context.stage.as_str())),
        }

        transition
    }
}

//! Services module
//!
//! This module contains business logic services

pub mod intake;
pub mod notification;
pub mod templates;

// Re-export commonly used services
pub use intake::IntakeService;
pub use notification::{
    DeliveryOutcome, DeliveryReport, DeliveryStatus, Destination, NotificationDispatcher,
};

use teloxide::Bot;

use crate::config::settings::Settings;
use crate::state::{IntakeFlow, StateStorage};

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub intake_service: IntakeService,
    pub notification_dispatcher: NotificationDispatcher,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(bot: Bot, settings: &Settings, state_storage: StateStorage) -> Self {
        let flow = IntakeFlow::new(settings.category_menu());
        let intake_service = IntakeService::new(flow, state_storage);
        let notification_dispatcher = NotificationDispatcher::new(bot, &settings.notifications);

        Self {
            intake_service,
            notification_dispatcher,
        }
    }

    /// Snapshot of service readiness for the health endpoint
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let stats = self.intake_service.storage().stats().await;
        let configured_destinations = self
            .notification_dispatcher
            .destinations()
            .iter()
            .filter(|d| d.chat_id.as_deref().is_some_and(|c| !c.trim().is_empty()))
            .count();

        ServiceHealthStatus {
            active_conversations: stats.active_contexts,
            configured_destinations,
            total_destinations: self.notification_dispatcher.destinations().len(),
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone, serde::Serialize)]
pub struct ServiceHealthStatus {
    pub active_conversations: usize,
    pub configured_destinations: usize,
    pub total_destinations: usize,
}

impl ServiceHealthStatus {
    /// Get list of configuration issues worth reporting
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.configured_destinations == 0 {
            issues.push("No notification destination configured".to_string());
        } else if self.configured_destinations < self.total_destinations {
            issues.push(format!(
                "{} of {} notification destinations are not configured",
                self.total_destinations - self.configured_destinations,
                self.total_destinations
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_issues() {
        let status = ServiceHealthStatus {
            active_conversations: 0,
            configured_destinations: 0,
            total_destinations: 2,
        };
        assert_eq!(status.get_issues(), vec!["No notification destination configured"]);

        let status = ServiceHealthStatus {
            configured_destinations: 1,
            ..status
        };
        assert_eq!(
            status.get_issues(),
            vec!["1 of 2 notification destinations are not configured"]
        );

        let status = ServiceHealthStatus {
            configured_destinations: 2,
            ..status
        };
        assert!(status.get_issues().is_empty());
    }
}

//! Test data fixtures

use chrono::{TimeZone, Utc};
use serde_json::json;
use teloxide::types::{CallbackQuery, Message};
use rg_service_bot::config::{
    DestinationConfig, NotificationsConfig, Settings, ADMIN_DESTINATION, STAFF_GROUP_DESTINATION,
};
use rg_service_bot::models::{Sender, SubmissionRecord};
use uuid::Uuid;

/// Answers used by the form scenarios, in question order
pub const FORM_ANSWERS: [&str; 4] = ["Ivan Petrov", "+372 5551234", "Tallinn, Main St 1", "leak"];

/// A complete submission as produced by a confirmed form
pub fn sample_submission() -> SubmissionRecord {
    SubmissionRecord {
        id: Uuid::new_v4(),
        category: "Тепловые насосы".to_string(),
        name: FORM_ANSWERS[0].to_string(),
        phone: FORM_ANSWERS[1].to_string(),
        address: FORM_ANSWERS[2].to_string(),
        comment: FORM_ANSWERS[3].to_string(),
        sender: Sender::new(super::test_user_id(), Some("ivan".to_string())),
        created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
    }
}

/// Staff group and admin destinations with the given chat ids
pub fn destinations(group: Option<&str>, admin: Option<&str>) -> NotificationsConfig {
    NotificationsConfig {
        destinations: vec![
            DestinationConfig {
                name: STAFF_GROUP_DESTINATION.to_string(),
                chat_id: group.map(str::to_string),
            },
            DestinationConfig {
                name: ADMIN_DESTINATION.to_string(),
                chat_id: admin.map(str::to_string),
            },
        ],
    }
}

/// Valid settings for tests
pub fn test_settings(notifications: NotificationsConfig) -> Settings {
    let mut settings = Settings::default();
    settings.bot.token = super::test_bot_token();
    settings.notifications = notifications;
    settings
}

fn user_json() -> serde_json::Value {
    json!({
        "id": super::test_user_id(),
        "is_bot": false,
        "first_name": "Ivan",
        "username": "ivan"
    })
}

fn private_chat_json() -> serde_json::Value {
    json!({
        "id": super::test_user_id(),
        "type": "private",
        "first_name": "Ivan",
        "username": "ivan"
    })
}

fn group_chat_json() -> serde_json::Value {
    json!({
        "id": super::test_group_id(),
        "type": "supergroup",
        "title": "RG Service staff"
    })
}

fn message_json(chat: serde_json::Value, text: &str) -> serde_json::Value {
    json!({
        "message_id": 42,
        "date": 1640995200,
        "chat": chat,
        "from": user_json(),
        "text": text
    })
}

/// A text message from the test user in their private chat
pub fn private_message(text: &str) -> Message {
    serde_json::from_value(message_json(private_chat_json(), text)).expect("valid private message")
}

/// A text message from the test user in the staff group
pub fn group_message(text: &str) -> Message {
    serde_json::from_value(message_json(group_chat_json(), text)).expect("valid group message")
}

/// A button press under a bot message in the test user's private chat
pub fn callback_query(data: Option<&str>) -> CallbackQuery {
    let mut query = json!({
        "id": "4382bfdwdsb323b2d9",
        "from": user_json(),
        "chat_instance": "-7890123456789",
        "message": message_json(private_chat_json(), "menu")
    });
    if let Some(data) = data {
        query["data"] = json!(data);
    }
    serde_json::from_value(query).expect("valid callback query")
}

/// A button press under a bot message in the staff group
pub fn group_callback_query(data: &str) -> CallbackQuery {
    serde_json::from_value(json!({
        "id": "4382bfdwdsb323b2da",
        "from": user_json(),
        "chat_instance": "-7890123456790",
        "message": message_json(group_chat_json(), "menu"),
        "data": data
    }))
    .expect("valid callback query")
}

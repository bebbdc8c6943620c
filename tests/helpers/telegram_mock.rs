//! Mock Telegram API Server for testing
//!
//! This module provides a mock HTTP server that simulates the Telegram Bot API
//! for testing purposes. It uses wiremock to create configurable mock responses.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{body_partial_json, method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

/// Configuration for mock responses
#[derive(Debug, Clone)]
pub struct MockResponseConfig {
    pub success: bool,
    pub delay_ms: Option<u64>,
}

impl Default for MockResponseConfig {
    fn default() -> Self {
        Self {
            success: true,
            delay_ms: None,
        }
    }
}

impl MockResponseConfig {
    pub fn failing() -> Self {
        Self {
            success: false,
            delay_ms: None,
        }
    }
}

impl TelegramMockServer {
    /// Create a new mock Telegram API server
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// A bot that talks to this server instead of api.telegram.org
    pub fn bot(&self) -> Bot {
        let api_url = self
            .server
            .uri()
            .parse()
            .expect("mock server uri is a valid url");
        Bot::new(test_bot_token()).set_api_url(api_url)
    }

    /// Setup mock for sendMessage to any chat
    pub async fn mock_send_message(&self, config: MockResponseConfig) {
        Mock::given(method("POST"))
            .and(path_regex(method_path("sendMessage")))
            .respond_with(send_message_response(&config, test_user_id()))
            .mount(&self.server)
            .await;
    }

    /// Setup mock for sendMessage to one chat; wins over the catch-all mock
    pub async fn mock_send_message_to(&self, chat_id: i64, config: MockResponseConfig) {
        Mock::given(method("POST"))
            .and(path_regex(method_path("sendMessage")))
            .and(body_partial_json(json!({ "chat_id": chat_id })))
            .respond_with(send_message_response(&config, chat_id))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Setup mock for sendMessage with one exact text; wins over the catch-all mock
    pub async fn mock_send_message_with_text(&self, text: &str, config: MockResponseConfig) {
        Mock::given(method("POST"))
            .and(path_regex(method_path("sendMessage")))
            .and(body_partial_json(json!({ "text": text })))
            .respond_with(send_message_response(&config, test_user_id()))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Setup mock for answerCallbackQuery endpoint
    pub async fn mock_answer_callback_query(&self, config: MockResponseConfig) {
        let (status, body) = if config.success {
            (200, json!({ "ok": true, "result": true }))
        } else {
            (400, error_body())
        };

        Mock::given(method("POST"))
            .and(path_regex(method_path("answerCallbackQuery")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Setup default successful mocks
    pub async fn setup_default_mocks(&self) {
        let config = MockResponseConfig::default();
        self.mock_send_message(config.clone()).await;
        self.mock_answer_callback_query(config).await;
    }

    /// JSON bodies of every sendMessage request received so far
    pub async fn sent_messages(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|req| req.url.path().to_lowercase().ends_with("/sendmessage"))
            .filter_map(|req| serde_json::from_slice(&req.body).ok())
            .collect()
    }

    /// sendMessage bodies addressed to one chat
    pub async fn sent_messages_to(&self, chat_id: i64) -> Vec<Value> {
        self.sent_messages()
            .await
            .into_iter()
            .filter(|body| body["chat_id"].as_i64() == Some(chat_id))
            .collect()
    }

    /// Verify that a specific endpoint was called
    pub async fn verify_endpoint_called(&self, endpoint: &str, times: usize) {
        let suffix = format!("/{}", endpoint.to_lowercase());
        let received_requests = self.server.received_requests().await.unwrap_or_default();
        let matching_requests = received_requests
            .iter()
            .filter(|req| req.url.path().to_lowercase().ends_with(&suffix))
            .count();

        assert_eq!(
            matching_requests, times,
            "Expected {} calls to {}, but got {}",
            times, endpoint, matching_requests
        );
    }
}

/// Bot API method names are case-insensitive and teloxide capitalizes them
fn method_path(name: &str) -> String {
    format!("(?i)/{}$", name)
}

fn send_message_response(config: &MockResponseConfig, chat_id: i64) -> ResponseTemplate {
    let (status, body) = if config.success {
        (
            200,
            json!({
                "ok": true,
                "result": {
                    "message_id": 123,
                    "from": {
                        "id": 12345,
                        "is_bot": true,
                        "first_name": "TestBot",
                        "username": "test_bot"
                    },
                    "chat": {
                        "id": chat_id,
                        "first_name": "Test",
                        "type": "private"
                    },
                    "date": 1640995200,
                    "text": "Test message"
                }
            }),
        )
    } else {
        (400, error_body())
    };

    let mut response = ResponseTemplate::new(status).set_body_json(body);
    if let Some(delay) = config.delay_ms {
        response = response.set_delay(std::time::Duration::from_millis(delay));
    }
    response
}

fn error_body() -> Value {
    json!({
        "ok": false,
        "error_code": 400,
        "description": "Bad Request: chat not found"
    })
}

/// Helper function to create a test bot token
pub fn test_bot_token() -> String {
    "12345:test_token".to_string()
}

/// Staff group chat used by the tests
pub fn test_group_id() -> i64 {
    -1001234567890
}

/// Admin chat used by the tests
pub fn test_admin_id() -> i64 {
    1124748302
}

/// Helper function to create test user ID
pub fn test_user_id() -> i64 {
    987654321
}

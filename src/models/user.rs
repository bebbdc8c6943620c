//! Submission sender model

use serde::{Deserialize, Serialize};

/// The Telegram user who filled in a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub user_id: i64,
    pub username: Option<String>,
}

impl Sender {
    pub fn new(user_id: i64, username: Option<String>) -> Self {
        Self { user_id, username }
    }

    /// `@username` when known, otherwise `@<id>`
    pub fn display(&self) -> String {
        match self.username.as_deref().filter(|u| !u.is_empty()) {
            Some(username) => format!("@{}", username),
            None => format!("@{}", self.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefers_username() {
        assert_eq!(Sender::new(42, Some("ivan".to_string())).display(), "@ivan");
        assert_eq!(Sender::new(42, None).display(), "@42");
        assert_eq!(Sender::new(42, Some(String::new())).display(), "@42");
    }
}

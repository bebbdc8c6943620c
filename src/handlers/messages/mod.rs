//! Message handlers module
//!
//! Typed answers to the form questions.

use teloxide::{types::Message, Bot};
use tracing::debug;

use crate::handlers::reply::process_event;
use crate::models::InboundEvent;
use crate::services::ServiceFactory;
use crate::utils::errors::{BotError, Result};

/// Handle incoming messages in private chats
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    services: &ServiceFactory,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BotError::InvalidInput("No user in message".to_string())
    })?;
    let user_id = user.id.0 as i64;

    if !msg.chat.is_private() {
        return Ok(());
    }

    debug!(user_id = user_id, chat_id = ?msg.chat.id, "Processing message");

    // Stickers, photos and the like count as an empty answer
    let text = msg.text().unwrap_or_default();
    // Commands reaching this handler were not recognised by the dispatcher
    let event = match leading_command(text) {
        Some(command) if command.contains('@') => {
            debug!(user_id = user_id, command = command, "Ignoring command addressed to another bot");
            return Ok(());
        }
        Some(command) => InboundEvent::command(user_id, command),
        None => InboundEvent::text(user_id, text),
    }
    .with_username(user.username.clone());
    process_event(&bot, msg.chat.id, event, services).await
}

/// The `/command` a message starts with, if any
fn leading_command(text: &str) -> Option<&str> {
    let text = text.trim_start();
    if !text.starts_with('/') {
        return None;
    }
    text.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_command() {
        assert_eq!(leading_command("/status"), Some("/status"));
        assert_eq!(leading_command("/start@OtherBot please"), Some("/start@OtherBot"));
        assert_eq!(leading_command("Ivan Petrov"), None);
        assert_eq!(leading_command("Tallinn, Main St 1/2"), None);
        assert_eq!(leading_command(""), None);
    }
}

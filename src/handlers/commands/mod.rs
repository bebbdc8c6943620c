//! Command handlers module
//!
//! This module contains handlers for the bot commands /start, /help and /cancel.

use teloxide::{
    requests::Requester,
    types::Message,
    utils::command::BotCommands,
    Bot,
};
use tracing::debug;

use crate::handlers::reply::process_event;
use crate::models::InboundEvent;
use crate::services::{templates, ServiceFactory};
use crate::utils::errors::{BotError, Result};

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Команды:")]
pub enum Command {
    #[command(description = "оставить заявку")]
    Start,
    #[command(description = "отменить заявку")]
    Cancel,
    #[command(description = "помощь")]
    Help,
}

impl Command {
    /// Name passed to the intake flow
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Cancel => "cancel",
            Command::Help => "help",
        }
    }
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: &ServiceFactory,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BotError::InvalidInput("No user in message".to_string())
    })?;
    let user_id = user.id.0 as i64;

    debug!(user_id = user_id, chat_id = ?msg.chat.id, command = cmd.name(), "Processing command");

    // Group chats (including the staff group) only get the help text
    if !msg.chat.is_private() {
        if cmd == Command::Help {
            bot.send_message(msg.chat.id, templates::HELP).await?;
        }
        return Ok(());
    }

    let event = InboundEvent::command(user_id, cmd.name()).with_username(user.username.clone());
    process_event(&bot, msg.chat.id, event, services).await
}

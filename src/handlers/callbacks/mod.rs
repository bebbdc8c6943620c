//! Callback query handlers module
//!
//! Inline keyboard presses: category selection and the confirm/edit buttons.

use teloxide::{requests::Requester, types::{CallbackQuery, ChatId}, Bot};
use tracing::{debug, warn};

use crate::handlers::reply::process_event;
use crate::models::InboundEvent;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: &ServiceFactory,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;

    // Answer first so the client stops showing the loading state
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = ?query.id, "Failed to answer callback query");
    }

    let Some(data) = query.data.clone() else {
        debug!(user_id = user_id, "Callback query without data");
        return Ok(());
    };

    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));

    if !chat_id.is_user() {
        debug!(user_id = user_id, chat_id = ?chat_id, "Ignoring callback outside private chat");
        return Ok(());
    }

    debug!(user_id = user_id, callback_data = %data, "Processing callback query");

    let event = InboundEvent::selection(user_id, data).with_username(query.from.username.clone());
    process_event(&bot, chat_id, event, services).await
}

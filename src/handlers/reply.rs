//! Rendering of intake transitions
//!
//! Every handler ends here: the event goes through the intake service, a
//! confirmed submission is dispatched to staff, and the resulting prompt is
//! sent back to the user.

use teloxide::{
    payloads::SendMessageSetters,
    requests::Requester,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode},
    Bot,
};
use tracing::warn;

use crate::models::{Choice, ChoiceLayout, InboundEvent, Prompt};
use crate::services::ServiceFactory;
use crate::state::SideEffect;
use crate::utils::errors::Result;

/// Run an event through the intake flow and answer the user
pub async fn process_event(
    bot: &Bot,
    chat_id: ChatId,
    event: InboundEvent,
    services: &ServiceFactory,
) -> Result<()> {
    let transition = services.intake_service.advance(&event).await;

    if let SideEffect::Submit(record) = &transition.effect {
        let report = services.notification_dispatcher.dispatch(record).await;
        if report.nothing_delivered() {
            warn!(
                submission_id = %report.submission_id,
                user_id = event.user_id,
                "Submission was not delivered to any destination"
            );
        }
        // The conversation is already reset; the menu still has to go out
        if let Err(e) = bot.send_message(chat_id, report.acknowledgment).await {
            warn!(
                submission_id = %report.submission_id,
                user_id = event.user_id,
                error = %e,
                "Failed to send acknowledgment"
            );
        }
    }

    send_prompt(bot, chat_id, &transition.prompt).await
}

/// Send a prompt with its buttons
pub async fn send_prompt(bot: &Bot, chat_id: ChatId, prompt: &Prompt) -> Result<()> {
    let request = bot
        .send_message(chat_id, prompt.text.clone())
        .parse_mode(ParseMode::Html);

    match &prompt.choices {
        Some(choices) => request.reply_markup(keyboard(choices, prompt.layout)).await?,
        None => request.await?,
    };
    Ok(())
}

/// Build an inline keyboard for the given choices
pub fn keyboard(choices: &[Choice], layout: ChoiceLayout) -> InlineKeyboardMarkup {
    let button = |c: &Choice| InlineKeyboardButton::callback(c.label.clone(), c.code.clone());

    match layout {
        ChoiceLayout::Column => {
            InlineKeyboardMarkup::new(choices.iter().map(|c| vec![button(c)]))
        }
        ChoiceLayout::Row => InlineKeyboardMarkup::new(vec![choices.iter().map(button).collect::<Vec<_>>()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryMenu, CONFIRM_CODE, EDIT_CODE};
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_data(button: &InlineKeyboardButton) -> &str {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data,
            other => panic!("unexpected button kind: {:?}", other),
        }
    }

    #[test]
    fn test_menu_keyboard_has_one_button_per_row() {
        let markup = keyboard(&CategoryMenu::default().choices(), ChoiceLayout::Column);

        assert_eq!(markup.inline_keyboard.len(), 4);
        assert!(markup.inline_keyboard.iter().all(|row| row.len() == 1));
        assert_eq!(markup.inline_keyboard[0][0].text, "Тепловые насосы");
        assert_eq!(callback_data(&markup.inline_keyboard[3][0]), "cat_pv");
    }

    #[test]
    fn test_confirmation_keyboard_is_single_row() {
        let choices = vec![
            Choice::new("✅ Отправить", CONFIRM_CODE),
            Choice::new("✏️ Изменить", EDIT_CODE),
        ];
        let markup = keyboard(&choices, ChoiceLayout::Row);

        assert_eq!(markup.inline_keyboard.len(), 1);
        assert_eq!(callback_data(&markup.inline_keyboard[0][0]), CONFIRM_CODE);
        assert_eq!(callback_data(&markup.inline_keyboard[0][1]), EDIT_CODE);
    }
}

//! Message templates
//!
//! Every text the bot sends, in Telegram HTML. User-supplied values are
//! escaped here and nowhere else.

use crate::models::SubmissionRecord;
use crate::utils::helpers::{escape_html, format_timestamp};

pub const GREETING: &str =
    "Привет! Я бот RG Service OÜ.\n\nВыберите категорию услуги, чтобы оставить заявку:";
pub const CHOOSE_CATEGORY: &str = "Пожалуйста, выберите категорию услуги кнопкой ниже:";
pub const ASK_NAME: &str = "Отлично! Напишите, пожалуйста, ваше <b>имя и фамилию</b>.";
pub const ASK_PHONE: &str = "Укажите <b>телефон</b> для связи:";
pub const ASK_ADDRESS: &str = "Укажите <b>адрес</b> (город, улица, дом):";
pub const ASK_COMMENT: &str = "Опишите <b>кратко задачу / комментарий</b>:";
pub const EMPTY_ANSWER: &str = "Ответ не может быть пустым.";
pub const ANSWER_TOO_LONG: &str = "Ответ слишком длинный. Пожалуйста, уложитесь в 800 символов.";
pub const TEXT_EXPECTED: &str = "Пожалуйста, ответьте текстом.";
pub const EDIT_RESTART: &str = "Окей, давайте заново. Введите <b>имя и фамилию</b>:";
pub const CONFIRM_HINT: &str = "Проверьте заявку и нажмите «✅ Отправить» или «✏️ Изменить».";
pub const ACKNOWLEDGMENT: &str =
    "Спасибо! Ваша заявка отправлена. Наш специалист свяжется с вами.";
pub const ANOTHER_REQUEST: &str = "Хотите отправить ещё одну заявку? Выберите категорию:";
pub const CANCELLED: &str =
    "Диалог отменён. Чтобы начать заново, выберите категорию или отправьте /start";
pub const HELP: &str = "Команды:\n/start — оставить заявку\n/cancel — отменить заявку\n/help — помощь";
pub const BUTTON_CONFIRM: &str = "✅ Отправить";
pub const BUTTON_EDIT: &str = "✏️ Изменить";

/// Render a submission as the summary shown to the user and sent to staff
pub fn format_summary(record: &SubmissionRecord) -> String {
    format!(
        "📝 <b>Новая заявка</b>\n\
         Категория: <b>{}</b>\n\
         Имя: <b>{}</b>\n\
         Телефон: <b>{}</b>\n\
         Адрес: <b>{}</b>\n\
         Комментарий: <i>{}</i>\n\
         Отправитель: {}\n\
         Создано: {}",
        escape_html(&record.category),
        escape_html(&record.name),
        escape_html(&record.phone),
        escape_html(&record.address),
        escape_html(&record.comment),
        escape_html(&record.sender.display()),
        format_timestamp(record.created_at),
    )
}

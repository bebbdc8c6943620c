//! Request intake flow
//!
//! A fixed, linear form: category, name, phone, address, comment, then a
//! confirmation step. Each inbound event is matched against the user's
//! current [`Stage`]; anything the stage does not accept re-sends the
//! current question and leaves the collected answers untouched.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::{
    CategoryMenu, Choice, InboundEvent, InputKind, Prompt, Sender, SubmissionRecord, CONFIRM_CODE,
    EDIT_CODE,
};
use crate::services::templates;
use crate::utils::helpers::generate_uuid;
use super::context::{ConversationContext, Field, Stage};

/// Longest accepted answer, in UTF-16 code units as Telegram counts them.
/// Four answers at this length still fit a 4096-unit summary message.
pub const MAX_ANSWER_LEN: usize = 800;

/// Commands understood in every stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowCommand {
    Start,
    Cancel,
    Help,
}

impl FlowCommand {
    /// Parse `start`, `/start` or `/start@SomeBot`
    pub fn parse(payload: &str) -> Option<Self> {
        let name = payload.trim().trim_start_matches('/');
        let name = name.split('@').next().unwrap_or(name);
        match name.to_lowercase().as_str() {
            "start" => Some(FlowCommand::Start),
            "cancel" => Some(FlowCommand::Cancel),
            "help" => Some(FlowCommand::Help),
            _ => None,
        }
    }
}

/// What an event did to the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAction {
    /// Answer stored, moved to the next stage
    Advanced,
    /// Input not accepted, current question repeated
    Reprompted,
    /// `/start`: conversation restarted from the menu
    Restarted,
    /// `/cancel`: answers dropped
    Cancelled,
    /// Confirmation step sent the user back to the name question
    Edited,
    /// Help shown, nothing changed
    Helped,
    /// Request confirmed and handed over for delivery
    Submitted,
}

/// Side effect the transport must carry out after sending the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    None,
    Submit(SubmissionRecord),
}

/// Result of feeding one event to the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub action: FlowAction,
    pub prompt: Prompt,
    pub effect: SideEffect,
}

impl Transition {
    fn new(action: FlowAction, prompt: Prompt) -> Self {
        Self {
            action,
            prompt,
            effect: SideEffect::None,
        }
    }

    /// The submission produced by this transition, if any
    pub fn submission(&self) -> Option<&SubmissionRecord> {
        match &self.effect {
            SideEffect::Submit(record) => Some(record),
            SideEffect::None => None,
        }
    }
}

/// Stage-tagged transition table of the request form
#[derive(Debug, Clone)]
pub struct IntakeFlow {
    menu: CategoryMenu,
}

impl IntakeFlow {
    pub fn new(menu: CategoryMenu) -> Self {
        Self { menu }
    }

    pub fn menu(&self) -> &CategoryMenu {
        &self.menu
    }

    /// Apply one event to a user's context
    pub fn advance(
        &self,
        context: &mut ConversationContext,
        event: &InboundEvent,
        now: DateTime<Utc>,
    ) -> Transition {
        if event.username.is_some() {
            context.username = event.username.clone();
        }

        if event.kind == InputKind::Command {
            if let Some(command) = FlowCommand::parse(&event.payload) {
                return self.run_command(context, command);
            }
            debug!(user_id = context.user_id, command = %event.payload, "Unknown command, repeating question");
            return self.reprompt(context, None, now);
        }

        match context.stage {
            Stage::AwaitingCategory => self.on_category(context, event, now),
            Stage::AwaitingName
            | Stage::AwaitingPhone
            | Stage::AwaitingAddress
            | Stage::AwaitingComment => self.on_text_answer(context, event, now),
            Stage::AwaitingConfirmation => self.on_confirmation(context, event, now),
        }
    }

    /// The question for the user's current stage
    pub fn current_prompt(&self, context: &ConversationContext, now: DateTime<Utc>) -> Prompt {
        match context.stage {
            Stage::AwaitingCategory => self.menu_prompt(templates::CHOOSE_CATEGORY),
            Stage::AwaitingName => Prompt::text(templates::ASK_NAME),
            Stage::AwaitingPhone => Prompt::text(templates::ASK_PHONE),
            Stage::AwaitingAddress => Prompt::text(templates::ASK_ADDRESS),
            Stage::AwaitingComment => Prompt::text(templates::ASK_COMMENT),
            Stage::AwaitingConfirmation => confirmation_prompt(&snapshot(context, now)),
        }
    }

    fn run_command(&self, context: &mut ConversationContext, command: FlowCommand) -> Transition {
        match command {
            FlowCommand::Start => {
                context.reset();
                Transition::new(FlowAction::Restarted, self.menu_prompt(templates::GREETING))
            }
            FlowCommand::Cancel => {
                context.reset();
                Transition::new(FlowAction::Cancelled, self.menu_prompt(templates::CANCELLED))
            }
            FlowCommand::Help => Transition::new(FlowAction::Helped, Prompt::text(templates::HELP)),
        }
    }

    fn on_category(
        &self,
        context: &mut ConversationContext,
        event: &InboundEvent,
        now: DateTime<Utc>,
    ) -> Transition {
        let category = match event.kind {
            InputKind::Selection => self.menu.find_by_code(event.payload.trim()),
            _ => None,
        };

        match category {
            Some(category) => {
                context.set_field(Field::Category, category.label.clone());
                context.advance_to(Stage::AwaitingName);
                Transition::new(FlowAction::Advanced, Prompt::text(templates::ASK_NAME))
            }
            None => self.reprompt(context, None, now),
        }
    }

    fn on_text_answer(
        &self,
        context: &mut ConversationContext,
        event: &InboundEvent,
        now: DateTime<Utc>,
    ) -> Transition {
        let Some(field) = context.stage.text_field() else {
            return self.reprompt(context, None, now);
        };

        if event.kind != InputKind::Text {
            return self.reprompt(context, Some(templates::TEXT_EXPECTED), now);
        }

        let answer = event.payload.trim();
        if answer.is_empty() {
            return self.reprompt(context, Some(templates::EMPTY_ANSWER), now);
        }
        if answer.encode_utf16().count() > MAX_ANSWER_LEN {
            return self.reprompt(context, Some(templates::ANSWER_TOO_LONG), now);
        }

        context.set_field(field, answer);
        context.advance_to(context.stage.next());
        Transition::new(FlowAction::Advanced, self.current_prompt(context, now))
    }

    fn on_confirmation(
        &self,
        context: &mut ConversationContext,
        event: &InboundEvent,
        now: DateTime<Utc>,
    ) -> Transition {
        if event.kind != InputKind::Selection {
            return self.reprompt_confirmation(context, now);
        }

        match event.payload.trim() {
            CONFIRM_CODE => {
                let mut record = snapshot(context, now);
                record.id = generate_uuid();
                context.reset();
                Transition {
                    action: FlowAction::Submitted,
                    prompt: self.menu_prompt(templates::ANOTHER_REQUEST),
                    effect: SideEffect::Submit(record),
                }
            }
            EDIT_CODE => {
                context.clear_answers();
                Transition::new(FlowAction::Edited, Prompt::text(templates::EDIT_RESTART))
            }
            _ => self.reprompt_confirmation(context, now),
        }
    }

    fn reprompt(
        &self,
        context: &ConversationContext,
        notice: Option<&str>,
        now: DateTime<Utc>,
    ) -> Transition {
        let mut prompt = self.current_prompt(context, now);
        if let Some(notice) = notice {
            prompt.text = format!("{}\n{}", notice, prompt.text);
        }
        Transition::new(FlowAction::Reprompted, prompt)
    }

    fn reprompt_confirmation(&self, context: &ConversationContext, now: DateTime<Utc>) -> Transition {
        let mut prompt = self.current_prompt(context, now);
        prompt.text = format!("{}\n\n{}", templates::CONFIRM_HINT, prompt.text);
        Transition::new(FlowAction::Reprompted, prompt)
    }

    fn menu_prompt(&self, text: &str) -> Prompt {
        Prompt::with_choices(text, self.menu.choices())
    }
}

/// Build a record from whatever the context holds; missing answers become empty strings
pub fn snapshot(context: &ConversationContext, now: DateTime<Utc>) -> SubmissionRecord {
    let field = |f: Field| context.field(f).unwrap_or_default().to_string();
    SubmissionRecord {
        id: uuid::Uuid::nil(),
        category: field(Field::Category),
        name: field(Field::Name),
        phone: field(Field::Phone),
        address: field(Field::Address),
        comment: field(Field::Comment),
        sender: Sender::new(context.user_id, context.username.clone()),
        created_at: now,
    }
}

fn confirmation_prompt(preview: &SubmissionRecord) -> Prompt {
    Prompt::with_choice_row(
        templates::format_summary(preview),
        vec![
            Choice::new(templates::BUTTON_CONFIRM, CONFIRM_CODE),
            Choice::new(templates::BUTTON_EDIT, EDIT_CODE),
        ],
    )
}

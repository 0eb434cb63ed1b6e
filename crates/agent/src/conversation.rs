//! Conversation driver
//!
//! Applies engine turns to a `ConversationState`: the user message and the
//! bot reply are both stamped with the stage current at the time of the
//! exchange, then the stage moves forward if the policy says so.

use std::sync::Arc;

use career_guide_core::{AssessmentStage, CategoryKey, ChatMessage, ConversationState};

use crate::engine::{AssessmentRequest, DialogueEngine};
use crate::stage::StageTransition;
use crate::Result;

/// Result of one applied exchange
#[derive(Debug, Clone)]
pub struct ExchangeOutcome {
    pub user_message: ChatMessage,
    pub bot_message: ChatMessage,
    pub category: Option<CategoryKey>,
    pub transition: Option<StageTransition>,
}

/// Drives assessment conversations through a shared engine
#[derive(Clone)]
pub struct Conversation {
    engine: Arc<DialogueEngine>,
}

impl Conversation {
    pub fn new(engine: Arc<DialogueEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<DialogueEngine> {
        &self.engine
    }

    /// Fresh conversation seeded with the greeting
    pub fn start(&self) -> ConversationState {
        let greeting = &self.engine.prompts().greeting;
        ConversationState::new(greeting.message.clone(), greeting.options.clone())
    }

    /// Back to the initial state
    pub fn reset(&self, state: &mut ConversationState) {
        let greeting = &self.engine.prompts().greeting;
        state.reset(greeting.message.clone(), greeting.options.clone());
        tracing::info!("Conversation reset");
    }

    /// Run one user turn against the state.
    ///
    /// On error the state is left untouched.
    pub fn exchange(&self, state: &mut ConversationState, text: &str) -> Result<ExchangeOutcome> {
        let request = AssessmentRequest::new(text, i64::from(state.current_stage.number()))
            .with_history(state.history());
        let response = self.engine.respond(&request)?;

        let user_message = state.push(ChatMessage::user(text)).clone();
        let bot_message = state
            .push(ChatMessage::bot(response.message).with_options(response.options))
            .clone();

        let next = AssessmentStage::from_number(response.next_stage);
        state.advance_to(next);

        if let Some(category) = &response.category {
            state.derived_roadmap_category = Some(category.clone());
        }

        tracing::debug!(
            stage = %state.current_stage,
            messages = state.messages.len(),
            "Exchange applied"
        );

        Ok(ExchangeOutcome {
            user_message,
            bot_message,
            category: response.category,
            transition: response.transition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use career_guide_config::{AssessmentConfig, ContentLibrary};
    use career_guide_core::{FixedPicker, Sender};

    fn conversation() -> Conversation {
        let engine = DialogueEngine::new(
            ContentLibrary::builtin(),
            &AssessmentConfig::default(),
            Arc::new(FixedPicker::first()),
        );
        Conversation::new(Arc::new(engine))
    }

    #[test]
    fn test_start_seeds_greeting() {
        let c = conversation();
        let state = c.start();
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].sender, Sender::Bot);
        assert!(!state.messages[0].suggested_options.is_empty());
    }

    #[test]
    fn test_exchange_appends_and_stamps() {
        let c = conversation();
        let mut state = c.start();
        let outcome = c.exchange(&mut state, "I love science").unwrap();

        assert_eq!(state.messages.len(), 3);
        assert_eq!(outcome.user_message.stage_when_sent, Some(AssessmentStage::Interests));
        assert_eq!(outcome.bot_message.stage_when_sent, Some(AssessmentStage::Interests));
        assert_eq!(outcome.bot_message.suggested_options.len(), 4);
        assert_eq!(state.current_stage, AssessmentStage::Skills);
        assert_eq!(state.derived_roadmap_category.as_ref().unwrap(), "science");
    }

    #[test]
    fn test_reset() {
        let c = conversation();
        let mut state = c.start();
        c.exchange(&mut state, "skip").unwrap();
        assert_eq!(state.current_stage, AssessmentStage::Priorities);

        c.reset(&mut state);
        assert_eq!(state.current_stage, AssessmentStage::Interests);
        assert_eq!(state.messages.len(), 1);
    }
}

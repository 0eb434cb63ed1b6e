//! Conversation types including assessment stages and chat messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CategoryKey;

/// Highest stage number the transition policy can reach
pub const MAX_STAGE_NUMBER: u8 = 5;

/// Assessment stages
///
/// Stages 1 to 4 explore the user, stage 5 recommends, and anything beyond is
/// the terminal extended-guidance stage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStage {
    /// Stage 1: what the user is interested in
    #[default]
    Interests,
    /// Stage 2: skills and strengths
    Skills,
    /// Stage 3: values and work environment
    Values,
    /// Stage 4: priorities
    Priorities,
    /// Stage 5: career recommendation
    Recommendation,
    /// Stage 6+: open-ended follow-up guidance
    ExtendedGuidance,
}

impl AssessmentStage {
    /// Map a caller-supplied stage number onto a stage.
    ///
    /// Numbers below 1 become `Interests`, numbers above 5 become
    /// `ExtendedGuidance`.
    pub fn from_number(number: i64) -> Self {
        match number {
            i64::MIN..=1 => AssessmentStage::Interests,
            2 => AssessmentStage::Skills,
            3 => AssessmentStage::Values,
            4 => AssessmentStage::Priorities,
            5 => AssessmentStage::Recommendation,
            _ => AssessmentStage::ExtendedGuidance,
        }
    }

    /// Stage number as used by callers (ExtendedGuidance reports 6)
    pub fn number(&self) -> u8 {
        match self {
            AssessmentStage::Interests => 1,
            AssessmentStage::Skills => 2,
            AssessmentStage::Values => 3,
            AssessmentStage::Priorities => 4,
            AssessmentStage::Recommendation => 5,
            AssessmentStage::ExtendedGuidance => 6,
        }
    }

    /// Next stage for automatic advancement, clamped at `Recommendation`
    pub fn next(&self) -> Self {
        match self {
            AssessmentStage::Interests => AssessmentStage::Skills,
            AssessmentStage::Skills => AssessmentStage::Values,
            AssessmentStage::Values => AssessmentStage::Priorities,
            AssessmentStage::Priorities => AssessmentStage::Recommendation,
            AssessmentStage::Recommendation => AssessmentStage::Recommendation,
            AssessmentStage::ExtendedGuidance => AssessmentStage::ExtendedGuidance,
        }
    }

    /// Whether this is one of the four exploration stages
    pub fn is_exploring(&self) -> bool {
        self.number() < MAX_STAGE_NUMBER
    }

    /// Whether automatic advancement stops here
    pub fn is_terminal(&self) -> bool {
        !self.is_exploring()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AssessmentStage::Interests => "Interests",
            AssessmentStage::Skills => "Skills",
            AssessmentStage::Values => "Values",
            AssessmentStage::Priorities => "Priorities",
            AssessmentStage::Recommendation => "Recommendation",
            AssessmentStage::ExtendedGuidance => "Extended Guidance",
        }
    }
}

impl std::fmt::Display for AssessmentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Who sent a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single message in the assessment chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_when_sent: Option<AssessmentStage>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            created_at: Utc::now(),
            suggested_options: Vec::new(),
            stage_when_sent: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.suggested_options = options;
        self
    }

    pub fn with_stage(mut self, stage: AssessmentStage) -> Self {
        self.stage_when_sent = Some(stage);
        self
    }

    /// Reduce to the shape the transition policy consumes
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            message: self.text.clone(),
            stage_when_sent: self.stage_when_sent.map(|s| i64::from(s.number())),
            sender: Some(self.sender),
        }
    }
}

/// One element of the conversation history handed to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_when_sent: Option<i64>,
    /// Who sent the message. Clients should send it: without it, bot text
    /// is indistinguishable from user text and can carry a category over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Sender>,
}

impl HistoryEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stage_when_sent: None,
            sender: None,
        }
    }

    pub fn at_stage(message: impl Into<String>, stage: i64) -> Self {
        Self {
            message: message.into(),
            stage_when_sent: Some(stage),
            sender: None,
        }
    }

    pub fn from_sender(mut self, sender: Sender) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Whether the entry is known to come from the bot
    pub fn is_bot(&self) -> bool {
        self.sender == Some(Sender::Bot)
    }

    /// Whether this entry was sent during `stage`
    pub fn sent_during(&self, stage: AssessmentStage) -> bool {
        self.stage_when_sent
            .map(AssessmentStage::from_number)
            .is_some_and(|s| s == stage)
    }
}

/// State of one assessment conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    pub messages: Vec<ChatMessage>,
    pub current_stage: AssessmentStage,
    #[serde(default)]
    pub derived_roadmap_category: Option<CategoryKey>,
}

impl ConversationState {
    /// Start a conversation at stage 1 with a single seed bot message
    pub fn new(greeting: impl Into<String>, options: Vec<String>) -> Self {
        let stage = AssessmentStage::Interests;
        Self {
            messages: vec![ChatMessage::bot(greeting)
                .with_options(options)
                .with_stage(stage)],
            current_stage: stage,
            derived_roadmap_category: None,
        }
    }

    /// Append a message stamped with the current stage
    pub fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        let message = message.with_stage(self.current_stage);
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Move forward to `stage`.
    ///
    /// Returns false and leaves the state untouched when `stage` would not be
    /// a forward move within the defined stages.
    pub fn advance_to(&mut self, stage: AssessmentStage) -> bool {
        if stage <= self.current_stage || stage.number() > MAX_STAGE_NUMBER {
            return false;
        }
        tracing::debug!(from = %self.current_stage, to = %stage, "Conversation stage advanced");
        self.current_stage = stage;
        true
    }

    /// Back to a fresh conversation
    pub fn reset(&mut self, greeting: impl Into<String>, options: Vec<String>) {
        *self = Self::new(greeting, options);
    }

    /// Messages reduced to history entries, oldest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.messages.iter().map(ChatMessage::to_history_entry).collect()
    }

    /// Number of user messages so far
    pub fn user_turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.sender == Sender::User)
            .count()
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_number_clamps() {
        assert_eq!(AssessmentStage::from_number(-3), AssessmentStage::Interests);
        assert_eq!(AssessmentStage::from_number(0), AssessmentStage::Interests);
        assert_eq!(AssessmentStage::from_number(1), AssessmentStage::Interests);
        assert_eq!(AssessmentStage::from_number(5), AssessmentStage::Recommendation);
        assert_eq!(AssessmentStage::from_number(6), AssessmentStage::ExtendedGuidance);
        assert_eq!(
            AssessmentStage::from_number(i64::MAX),
            AssessmentStage::ExtendedGuidance
        );
    }

    #[test]
    fn test_stage_next_is_clamped() {
        assert_eq!(AssessmentStage::Interests.next(), AssessmentStage::Skills);
        assert_eq!(
            AssessmentStage::Priorities.next(),
            AssessmentStage::Recommendation
        );
        assert_eq!(
            AssessmentStage::Recommendation.next(),
            AssessmentStage::Recommendation
        );
        assert!(AssessmentStage::Priorities.is_exploring());
        assert!(AssessmentStage::Recommendation.is_terminal());
    }

    #[test]
    fn test_new_state_has_seed_message() {
        let state = ConversationState::new("Hi there", vec!["Technology".into()]);
        assert_eq!(state.current_stage, AssessmentStage::Interests);
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].sender, Sender::Bot);
        assert_eq!(
            state.messages[0].stage_when_sent,
            Some(AssessmentStage::Interests)
        );
        assert!(state.derived_roadmap_category.is_none());
    }

    #[test]
    fn test_push_stamps_current_stage() {
        let mut state = ConversationState::new("Hi", vec![]);
        state.advance_to(AssessmentStage::Skills);
        // An existing stamp is overwritten with the stage at append time
        let msg = state.push(ChatMessage::user("hello").with_stage(AssessmentStage::Values));
        assert_eq!(msg.stage_when_sent, Some(AssessmentStage::Skills));
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut state = ConversationState::new("Hi", vec![]);
        assert!(state.advance_to(AssessmentStage::Values));
        assert!(!state.advance_to(AssessmentStage::Skills));
        assert_eq!(state.current_stage, AssessmentStage::Values);
        assert!(!state.advance_to(AssessmentStage::ExtendedGuidance));
        assert!(state.advance_to(AssessmentStage::Recommendation));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut state = ConversationState::new("Hi", vec![]);
        state.push(ChatMessage::user("tech"));
        state.advance_to(AssessmentStage::Priorities);
        state.derived_roadmap_category = Some(CategoryKey::new("technology"));

        state.reset("Hello again", vec![]);
        assert_eq!(state.current_stage, AssessmentStage::Interests);
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].text, "Hello again");
        assert!(state.derived_roadmap_category.is_none());
    }

    #[test]
    fn test_history_entries() {
        let mut state = ConversationState::new("Hi", vec![]);
        state.push(ChatMessage::user("I like math"));
        let history = state.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].message, "I like math");
        assert_eq!(history[1].stage_when_sent, Some(1));
        assert!(history[1].sent_during(AssessmentStage::Interests));
        assert!(!HistoryEntry::new("x").sent_during(AssessmentStage::Interests));
        assert!(history[0].is_bot());
        assert!(!history[1].is_bot());
        assert!(!HistoryEntry::new("x").is_bot());
        assert_eq!(state.user_turns(), 1);
    }

    #[test]
    fn test_state_serde_roundtrip_keeps_stage() {
        let mut state = ConversationState::new("Hi", vec!["A".into()]);
        state.advance_to(AssessmentStage::Skills);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"skills\""));
        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}

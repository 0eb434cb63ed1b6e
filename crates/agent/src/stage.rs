//! Stage-Based Dialog Management
//!
//! The single authority for assessment stage advancement. A turn advances at
//! most one stage, except for the skip keyword which jumps straight to the
//! configured target. Stages from `Recommendation` on never advance
//! automatically.
//!
//! Triggers, checked in order:
//! 1. Skip keyword in the user message (only below the skip target)
//! 2. Message threshold: enough history entries stamped with the current stage
//! 3. Trigger phrase in the lowercased last exchange
//! 4. Selector advice, when `honor_advisory_advance` is set

use career_guide_config::{AssessmentConfig, StageTriggers};
use career_guide_core::{AssessmentStage, HistoryEntry};
use serde::{Deserialize, Serialize};

/// Reason for stage transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum TransitionReason {
    /// User asked to skip ahead
    SkipRequested,
    /// Enough messages were exchanged in the stage
    MessageThreshold(usize),
    /// A stage trigger phrase appeared in the last exchange
    TriggerPhrase(String),
    /// The response selector advised advancing
    SelectorAdvice,
}

impl TransitionReason {
    /// Short label for metrics and logs
    pub fn label(&self) -> &'static str {
        match self {
            TransitionReason::SkipRequested => "skip",
            TransitionReason::MessageThreshold(_) => "threshold",
            TransitionReason::TriggerPhrase(_) => "trigger",
            TransitionReason::SelectorAdvice => "selector",
        }
    }
}

/// A stage change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: AssessmentStage,
    pub to: AssessmentStage,
    pub reason: TransitionReason,
}

/// Outcome of a policy evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDecision {
    pub stage: AssessmentStage,
    pub transition: Option<StageTransition>,
}

impl StageDecision {
    fn stay(stage: AssessmentStage) -> Self {
        Self {
            stage,
            transition: None,
        }
    }

    fn advance(from: AssessmentStage, to: AssessmentStage, reason: TransitionReason) -> Self {
        Self {
            stage: to,
            transition: Some(StageTransition { from, to, reason }),
        }
    }

    pub fn advanced(&self) -> bool {
        self.transition.is_some()
    }
}

/// Stage transition policy
#[derive(Debug, Clone)]
pub struct StageTransitionPolicy {
    message_threshold: usize,
    skip_keyword: String,
    skip_target: AssessmentStage,
    triggers: StageTriggers,
    honor_advisory_advance: bool,
}

impl Default for StageTransitionPolicy {
    fn default() -> Self {
        Self::new(&AssessmentConfig::default())
    }
}

impl StageTransitionPolicy {
    pub fn new(config: &AssessmentConfig) -> Self {
        Self {
            message_threshold: config.stage_message_threshold,
            skip_keyword: config.skip_keyword.to_lowercase(),
            skip_target: config.skip_target(),
            triggers: config.triggers.clone(),
            honor_advisory_advance: config.honor_advisory_advance,
        }
    }

    /// Next stage from content and history alone, ignoring selector advice
    pub fn next_stage(
        &self,
        current: AssessmentStage,
        history: &[HistoryEntry],
        last_user_message: &str,
        last_bot_message: &str,
    ) -> AssessmentStage {
        self.decide(current, history, last_user_message, last_bot_message, false)
            .stage
    }

    /// Evaluate all triggers, including the selector's advisory flag
    pub fn decide(
        &self,
        current: AssessmentStage,
        history: &[HistoryEntry],
        last_user_message: &str,
        last_bot_message: &str,
        selector_advice: bool,
    ) -> StageDecision {
        if current.is_terminal() {
            return StageDecision::stay(current);
        }

        let user = last_user_message.to_lowercase();
        if current < self.skip_target && user.contains(&self.skip_keyword) {
            return StageDecision::advance(current, self.skip_target, TransitionReason::SkipRequested);
        }

        let next = current.next();

        let count = history.iter().filter(|e| e.sent_during(current)).count();
        if count >= self.message_threshold {
            return StageDecision::advance(current, next, TransitionReason::MessageThreshold(count));
        }

        let exchange = format!("{} {}", user, last_bot_message.to_lowercase());
        if let Some(phrase) = self
            .triggers
            .for_stage(current)
            .iter()
            .find(|phrase| !phrase.is_empty() && exchange.contains(&phrase.to_lowercase()))
        {
            return StageDecision::advance(
                current,
                next,
                TransitionReason::TriggerPhrase(phrase.clone()),
            );
        }

        if selector_advice && self.honor_advisory_advance {
            return StageDecision::advance(current, next, TransitionReason::SelectorAdvice);
        }

        StageDecision::stay(current)
    }
}

//! Dialogue engine
//!
//! One call per user turn: classify, select a reply, decide the next stage.
//! The engine holds only immutable content and is safe to share between
//! sessions.

use std::sync::Arc;

use career_guide_config::{AssessmentConfig, ContentLibrary, PromptTemplates, Settings};
use career_guide_core::{
    AssessmentStage, CategoryKey, HistoryEntry, RandomPicker, SeededPicker, Sender, TemplatePicker,
};
use serde::{Deserialize, Serialize};

use crate::classifier::CategoryClassifier;
use crate::responder::ResponseSelector;
use crate::stage::{StageTransition, StageTransitionPolicy};
use crate::Result;

/// Engine input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    pub message: String,
    /// Caller's stage number; out-of-range values are clamped
    pub stage: i64,
    /// Earlier messages, oldest first, excluding this turn
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
}

impl AssessmentRequest {
    pub fn new(message: impl Into<String>, stage: i64) -> Self {
        Self {
            message: message.into(),
            stage,
            conversation_history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.conversation_history = history;
        self
    }
}

/// Engine output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub message: String,
    pub options: Vec<String>,
    pub next_stage: i64,
    /// Category the reply was based on, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<StageTransition>,
}

/// Picker selected by configuration: seeded when `random_seed` is set
pub fn picker_for(config: &AssessmentConfig) -> Arc<dyn TemplatePicker> {
    match config.random_seed {
        Some(seed) => Arc::new(SeededPicker::new(seed)),
        None => Arc::new(RandomPicker),
    }
}

/// Rule-based assessment dialogue engine
pub struct DialogueEngine {
    content: ContentLibrary,
    classifier: CategoryClassifier,
    selector: ResponseSelector,
    policy: StageTransitionPolicy,
    carry_over_category: bool,
}

impl DialogueEngine {
    pub fn new(
        content: ContentLibrary,
        config: &AssessmentConfig,
        picker: Arc<dyn TemplatePicker>,
    ) -> Self {
        let classifier = CategoryClassifier::new(content.catalog().clone());
        let selector = ResponseSelector::new(
            content.catalog().clone(),
            content.prompts().clone(),
            config.clone(),
            picker,
        );
        Self {
            content,
            classifier,
            selector,
            policy: StageTransitionPolicy::new(config),
            carry_over_category: config.carry_over_category,
        }
    }

    /// Built-in content with the configured picker
    pub fn builtin(config: &AssessmentConfig) -> Self {
        Self::new(ContentLibrary::builtin(), config, picker_for(config))
    }

    /// Load content named in settings and build the engine
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let content = ContentLibrary::load(settings)?;
        let picker = picker_for(&settings.assessment);
        Ok(Self::new(content, &settings.assessment, picker))
    }

    pub fn content(&self) -> &ContentLibrary {
        &self.content
    }

    pub fn prompts(&self) -> &Arc<PromptTemplates> {
        self.content.prompts()
    }

    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    pub fn policy(&self) -> &StageTransitionPolicy {
        &self.policy
    }

    /// Process one user turn
    pub fn respond(&self, request: &AssessmentRequest) -> Result<AssessmentResponse> {
        let stage = AssessmentStage::from_number(request.stage);
        let history = &request.conversation_history;

        let category = if self.carry_over_category {
            self.classifier
                .classify_with_history(&request.message, history)
        } else {
            self.classifier.classify(&request.message)
        };

        let reply = self
            .selector
            .select(&request.message, stage, category.as_ref())?;

        // The policy sees this exchange as part of the history
        let stamp = i64::from(stage.number());
        let mut full_history = Vec::with_capacity(history.len() + 2);
        full_history.extend(history.iter().cloned());
        full_history.push(HistoryEntry::at_stage(request.message.as_str(), stamp).from_sender(Sender::User));
        full_history.push(HistoryEntry::at_stage(reply.message.as_str(), stamp).from_sender(Sender::Bot));

        let decision = self.policy.decide(
            stage,
            &full_history,
            &request.message,
            &reply.message,
            reply.advance_stage,
        );

        if let Some(transition) = &decision.transition {
            tracing::info!(
                from = %transition.from,
                to = %transition.to,
                reason = ?transition.reason,
                "Assessment stage transition"
            );
        }

        Ok(AssessmentResponse {
            message: reply.message,
            options: reply.options,
            next_stage: i64::from(decision.stage.number()),
            category,
            transition: decision.transition,
        })
    }
}

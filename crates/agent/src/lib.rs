//! Assessment Dialogue Engine
//!
//! Features:
//! - Category classification by direct name match and keyword frequency
//! - Stage-aware response selection with injected randomness
//! - A single stage transition policy (selector advice is input, not authority)
//! - Conversation driver applying exchanges to a `ConversationState`

pub mod classifier;
pub mod conversation;
pub mod engine;
pub mod responder;
pub mod stage;

pub use classifier::CategoryClassifier;
pub use conversation::{Conversation, ExchangeOutcome};
pub use engine::{AssessmentRequest, AssessmentResponse, DialogueEngine};
pub use responder::{AssessmentReply, ResponseSelector};
pub use stage::{StageDecision, StageTransition, StageTransitionPolicy, TransitionReason};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    /// Malformed static data (missing category, empty template list)
    #[error("Data error: {0}")]
    Data(#[from] career_guide_core::Error),

    /// Content or settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] career_guide_config::ConfigError),
}

impl AgentError {
    /// Whether the static content is broken, as opposed to a runtime fault
    pub fn is_data_error(&self) -> bool {
        match self {
            AgentError::Data(e) => e.is_data_error(),
            AgentError::Config(_) => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;

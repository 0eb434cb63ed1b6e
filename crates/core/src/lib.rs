//! Core traits and types for the career guide assessment
//!
//! This crate provides foundational types used across all other crates:
//! - Assessment stages and conversation state
//! - Category catalog and roadmap data types
//! - Bookmark records
//! - Collaborator traits (persistence, content lookup, template picking)
//! - Error types

pub mod bookmark;
pub mod catalog;
pub mod conversation;
pub mod error;
pub mod roadmap;
pub mod traits;

pub use bookmark::{Bookmark, NewBookmark};
pub use catalog::{CareerPath, CategoryData, CategoryKey};
pub use conversation::{
    AssessmentStage, ChatMessage, ConversationState, HistoryEntry, Sender, MAX_STAGE_NUMBER,
};
pub use error::{Error, Result};
pub use roadmap::{RoadmapData, RoadmapPhase};

pub use traits::{
    pick, BookmarkStore, ContentCatalog, ConversationStore, FixedPicker, RandomPicker,
    SeededPicker, TemplatePicker,
};

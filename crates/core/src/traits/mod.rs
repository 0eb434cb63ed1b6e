//! Core traits for the career guide
//!
//! Collaborators are injected through these traits so that:
//! - The dialogue engine stays free of I/O and global state
//! - Tests can substitute deterministic implementations
//! - Storage backends can be swapped without touching the engine
//!
//! # Trait Overview
//!
//! ```text
//! Engine:
//!   - TemplatePicker: chooses template indices and coin flips
//!
//! Content:
//!   - ContentCatalog: category and roadmap lookup
//!
//! Persistence:
//!   - ConversationStore: load/save conversation state per session
//!   - BookmarkStore: bookmarked roadmaps with one primary per user
//! ```

mod catalog;
mod picker;
mod store;

pub use catalog::ContentCatalog;
pub use picker::{pick, FixedPicker, RandomPicker, SeededPicker, TemplatePicker};
pub use store::{BookmarkStore, ConversationStore};

//! Persistence collaborators

use async_trait::async_trait;

use crate::bookmark::{Bookmark, NewBookmark};
use crate::conversation::ConversationState;
use crate::Result;

/// Conversation persistence keyed by session id
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load a conversation, `None` if the session is unknown
    async fn load(&self, session_id: &str) -> Result<Option<ConversationState>>;

    /// Store (insert or replace) a conversation
    async fn save(&self, session_id: &str, state: &ConversationState) -> Result<()>;

    /// Forget a conversation
    async fn delete(&self, session_id: &str) -> Result<()>;

    /// All known session ids
    async fn list_ids(&self) -> Result<Vec<String>>;
}

/// Bookmarked roadmaps, with at most one primary bookmark per user
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// A user's bookmarks, oldest first
    async fn list(&self, user_id: &str) -> Result<Vec<Bookmark>>;

    /// Add the bookmark, or remove it if the user already has it.
    ///
    /// Returns the stored bookmark when added, `None` when removed.
    async fn toggle(&self, request: NewBookmark) -> Result<Option<Bookmark>>;

    /// Make this career the user's primary roadmap, bookmarking it if needed
    async fn set_primary(&self, request: NewBookmark) -> Result<Bookmark>;

    /// The user's primary bookmark, if any
    async fn primary(&self, user_id: &str) -> Result<Option<Bookmark>>;
}

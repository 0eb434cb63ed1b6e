//! In-memory bookmark store

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use career_guide_core::{Bookmark, BookmarkStore, NewBookmark, Result};

/// Bookmarks per user, kept in insertion order
#[derive(Default)]
pub struct InMemoryBookmarkStore {
    bookmarks: RwLock<HashMap<String, Vec<Bookmark>>>,
}

impl InMemoryBookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookmarkStore for InMemoryBookmarkStore {
    async fn list(&self, user_id: &str) -> Result<Vec<Bookmark>> {
        Ok(self
            .bookmarks
            .read()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn toggle(&self, request: NewBookmark) -> Result<Option<Bookmark>> {
        let mut bookmarks = self.bookmarks.write();
        let entries = bookmarks.entry(request.user_id.clone()).or_default();

        if let Some(pos) = entries.iter().position(|b| b.matches(&request.career_name)) {
            let removed = entries.remove(pos);
            tracing::debug!(user_id = %removed.user_id, career = %removed.career_name, "Bookmark removed");
            return Ok(None);
        }

        let bookmark = Bookmark::from_request(request);
        tracing::debug!(user_id = %bookmark.user_id, career = %bookmark.career_name, "Bookmark added");
        entries.push(bookmark.clone());
        Ok(Some(bookmark))
    }

    async fn set_primary(&self, request: NewBookmark) -> Result<Bookmark> {
        let mut bookmarks = self.bookmarks.write();
        let entries = bookmarks.entry(request.user_id.clone()).or_default();

        for entry in entries.iter_mut() {
            entry.is_primary = false;
        }

        let pos = match entries.iter().position(|b| b.matches(&request.career_name)) {
            Some(pos) => pos,
            None => {
                entries.push(Bookmark::from_request(request));
                entries.len() - 1
            }
        };

        let primary = &mut entries[pos];
        primary.is_primary = true;
        tracing::info!(user_id = %primary.user_id, career = %primary.career_name, "Primary roadmap set");
        Ok(primary.clone())
    }

    async fn primary(&self, user_id: &str) -> Result<Option<Bookmark>> {
        Ok(self
            .bookmarks
            .read()
            .get(user_id)
            .and_then(|entries| entries.iter().find(|b| b.is_primary).cloned()))
    }
}

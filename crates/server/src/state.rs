//! Application State
//!
//! Shared state across all handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use career_guide_agent::{Conversation, DialogueEngine};
use career_guide_config::{ContentLibrary, Settings};
use career_guide_core::{BookmarkStore, ConversationState, ConversationStore};

use crate::bookmarks::InMemoryBookmarkStore;
use crate::session::{InMemoryConversationStore, Session, SessionManager};
use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub engine: Arc<DialogueEngine>,
    pub conversation: Conversation,
    pub sessions: Arc<SessionManager>,
    /// Conversation persistence
    pub store: Arc<dyn ConversationStore>,
    pub bookmarks: Arc<dyn BookmarkStore>,
    /// Set when the Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create application state with in-memory stores
    pub fn new(config: Settings, engine: DialogueEngine) -> Self {
        Self::with_stores(
            config,
            engine,
            Arc::new(InMemoryConversationStore::new()),
            Arc::new(InMemoryBookmarkStore::new()),
        )
    }

    /// Create application state with custom stores
    pub fn with_stores(
        config: Settings,
        engine: DialogueEngine,
        store: Arc<dyn ConversationStore>,
        bookmarks: Arc<dyn BookmarkStore>,
    ) -> Self {
        let engine = Arc::new(engine);
        Self {
            sessions: Arc::new(SessionManager::from_config(&config.server)),
            config: Arc::new(config),
            conversation: Conversation::new(engine.clone()),
            engine,
            store,
            bookmarks,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn content(&self) -> &ContentLibrary {
        self.engine.content()
    }

    /// Open a session and persist its greeting state
    pub async fn create_session(&self) -> Result<(Arc<Session>, ConversationState), ServerError> {
        let (session, evicted) = self.sessions.create()?;
        for id in &evicted {
            self.store.delete(id).await?;
        }

        let state = self.conversation.start();
        self.store.save(&session.id, &state).await?;
        crate::metrics::record_session_count(self.sessions.count());
        Ok((session, state))
    }

    /// Close a session and forget its conversation.
    ///
    /// Waits for an in-flight turn so it cannot save after the delete.
    pub async fn close_session(&self, id: &str) -> Result<bool, ServerError> {
        let existed = match self.sessions.get(id) {
            Some(session) => {
                let _turn = session.lock_turn().await;
                let removed = self.sessions.remove(id);
                self.store.delete(id).await?;
                removed
            }
            None => {
                self.store.delete(id).await?;
                false
            }
        };
        crate::metrics::record_session_count(self.sessions.count());
        Ok(existed)
    }
}

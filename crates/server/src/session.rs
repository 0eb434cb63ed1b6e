//! Session Management
//!
//! Tracks live assessment sessions and expires idle ones. Conversation state
//! itself lives behind a `ConversationStore`; the in-memory store here is the
//! default backend.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex, MutexGuard};

use career_guide_config::ServerConfig;
use career_guide_core::{AssessmentStage, ConversationState, ConversationStore};

use crate::ServerError;

/// In-memory conversation store
#[derive(Default)]
pub struct InMemoryConversationStore {
    states: RwLock<HashMap<String, ConversationState>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn load(&self, session_id: &str) -> career_guide_core::Result<Option<ConversationState>> {
        Ok(self.states.read().get(session_id).cloned())
    }

    async fn save(
        &self,
        session_id: &str,
        state: &ConversationState,
    ) -> career_guide_core::Result<()> {
        self.states
            .write()
            .insert(session_id.to_string(), state.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> career_guide_core::Result<()> {
        self.states.write().remove(session_id);
        Ok(())
    }

    async fn list_ids(&self) -> career_guide_core::Result<Vec<String>> {
        Ok(self.states.read().keys().cloned().collect())
    }
}

/// Session
pub struct Session {
    /// Session ID
    pub id: String,
    /// Creation time
    pub created_at: Instant,
    /// Last activity
    pub last_activity: RwLock<Instant>,
    /// Is active
    pub active: RwLock<bool>,
    stage: RwLock<AssessmentStage>,
    /// Serializes turns so concurrent messages cannot interleave load and save
    turn_lock: Mutex<()>,
}

impl Session {
    /// Create a new session
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Instant::now(),
            last_activity: RwLock::new(Instant::now()),
            active: RwLock::new(true),
            stage: RwLock::new(AssessmentStage::default()),
            turn_lock: Mutex::new(()),
        }
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Check if session is expired
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }

    /// Close session
    pub fn close(&self) {
        *self.active.write() = false;
    }

    /// Is session active
    pub fn is_active(&self) -> bool {
        *self.active.read()
    }

    /// Stage after the most recent turn
    pub fn stage(&self) -> AssessmentStage {
        *self.stage.read()
    }

    pub fn set_stage(&self, stage: AssessmentStage) {
        *self.stage.write() = stage;
    }

    /// Hold for the duration of one turn
    pub async fn lock_turn(&self) -> MutexGuard<'_, ()> {
        self.turn_lock.lock().await
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(max_sessions: usize) -> Self {
        Self::with_config(
            max_sessions,
            Duration::from_secs(3600),
            Duration::from_secs(60),
        )
    }

    /// Create a new session manager with custom timeout and cleanup interval
    pub fn with_config(
        max_sessions: usize,
        session_timeout: Duration,
        cleanup_interval: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout,
            cleanup_interval,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::with_config(
            config.max_sessions,
            Duration::from_secs(config.session_timeout_secs),
            Duration::from_secs(config.cleanup_interval_secs),
        )
    }

    /// Start a background task that periodically removes expired sessions
    /// and deletes their conversations from the store.
    ///
    /// Returns a shutdown sender that stops the task.
    pub fn start_cleanup_task(
        self: &Arc<Self>,
        store: Arc<dyn ConversationStore>,
    ) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let expired = manager.cleanup_expired();
                        for id in &expired {
                            if let Err(e) = store.delete(id).await {
                                tracing::warn!(session_id = %id, error = %e, "Failed to delete expired conversation");
                            }
                        }
                        if !expired.is_empty() {
                            tracing::info!(
                                "Session cleanup: removed {} expired sessions ({} remaining)",
                                expired.len(),
                                manager.count()
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a new session.
    ///
    /// When at capacity, expired sessions are dropped first; their ids are
    /// returned so the caller can forget their conversations.
    pub fn create(&self) -> Result<(Arc<Session>, Vec<String>), ServerError> {
        let mut sessions = self.sessions.write();

        let mut evicted = Vec::new();
        if sessions.len() >= self.max_sessions {
            evicted = Self::drain_expired(&mut sessions, self.session_timeout);

            if sessions.len() >= self.max_sessions {
                tracing::warn!(max_sessions = self.max_sessions, "Session capacity reached");
                return Err(ServerError::Capacity);
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Session::new(&id));
        sessions.insert(id.clone(), session.clone());

        tracing::info!(session_id = %id, "Created session");

        Ok((session, evicted))
    }

    /// Get a session by ID
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().get(id).cloned()
    }

    /// Remove a session, returning whether it existed
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().remove(id);
        match removed {
            Some(session) => {
                session.close();
                tracing::info!("Removed session: {}", id);
                true
            }
            None => false,
        }
    }

    /// Number of live sessions
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// IDs of live sessions
    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }

    /// Drop expired sessions, returning their ids
    pub fn cleanup_expired(&self) -> Vec<String> {
        let mut sessions = self.sessions.write();
        Self::drain_expired(&mut sessions, self.session_timeout)
    }

    fn drain_expired(
        sessions: &mut HashMap<String, Arc<Session>>,
        timeout: Duration,
    ) -> Vec<String> {
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(timeout) || !s.is_active())
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            if let Some(session) = sessions.remove(id) {
                session.close();
            }
        }

        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let manager = SessionManager::new(10);
        let (session, evicted) = manager.create().unwrap();
        assert!(evicted.is_empty());
        assert!(session.is_active());
        assert_eq!(session.stage(), AssessmentStage::Interests);
        assert!(manager.get(&session.id).is_some());
        assert_eq!(manager.count(), 1);
    }

    #[test]
    fn test_remove() {
        let manager = SessionManager::new(10);
        let (session, _) = manager.create().unwrap();
        assert!(manager.remove(&session.id));
        assert!(!session.is_active());
        assert!(!manager.remove(&session.id));
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_capacity() {
        let manager = SessionManager::new(2);
        manager.create().unwrap();
        manager.create().unwrap();
        assert!(matches!(manager.create(), Err(ServerError::Capacity)));
    }

    #[test]
    fn test_expired_sessions_make_room() {
        let manager =
            SessionManager::with_config(1, Duration::from_millis(0), Duration::from_secs(60));
        let (first, _) = manager.create().unwrap();
        std::thread::sleep(Duration::from_millis(5));

        let (second, evicted) = manager.create().unwrap();
        assert_eq!(evicted, vec![first.id.clone()]);
        assert!(manager.get(&first.id).is_none());
        assert!(manager.get(&second.id).is_some());
    }

    #[test]
    fn test_cleanup_expired() {
        let manager =
            SessionManager::with_config(10, Duration::from_millis(0), Duration::from_secs(60));
        manager.create().unwrap();
        manager.create().unwrap();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(manager.cleanup_expired().len(), 2);
        assert_eq!(manager.count(), 0);
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryConversationStore::new();
        let state = ConversationState::new("Hi!", vec!["Technology".into()]);

        assert!(store.load("a").await.unwrap().is_none());
        store.save("a", &state).await.unwrap();
        assert_eq!(store.load("a").await.unwrap(), Some(state));
        assert_eq!(store.list_ids().await.unwrap(), vec!["a".to_string()]);

        store.delete("a").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_task_deletes_conversations() {
        let manager = Arc::new(SessionManager::with_config(
            10,
            Duration::from_millis(0),
            Duration::from_millis(10),
        ));
        let store = Arc::new(InMemoryConversationStore::new());
        let (session, _) = manager.create().unwrap();
        store
            .save(&session.id, &ConversationState::new("Hi!", Vec::new()))
            .await
            .unwrap();

        let shutdown = manager.start_cleanup_task(store.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = shutdown.send(true);

        assert_eq!(manager.count(), 0);
        assert!(store.is_empty());
    }
}

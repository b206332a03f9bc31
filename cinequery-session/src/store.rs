//! In-memory store of per-session conversation states.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::state::ConversationState;

/// Maps session ids to independent [`ConversationState`]s.
///
/// Each state sits behind its own `Mutex`, preserving the
/// single-writer-per-session contract while letting unrelated sessions
/// proceed concurrently. States are created on first use and dropped at
/// session end via [`remove`](InMemorySessionStore::remove).
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<ConversationState>>>>,
    window: usize,
}

impl InMemorySessionStore {
    /// Create a store whose sessions retain at most `window` turns.
    pub fn new(window: usize) -> Self {
        Self { sessions: RwLock::new(HashMap::new()), window }
    }

    /// Fetch the state for `session_id`, creating it if absent.
    pub async fn get_or_create(&self, session_id: &str) -> Arc<Mutex<ConversationState>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(state) = sessions.get(session_id) {
                return Arc::clone(state);
            }
        }
        let mut sessions = self.sessions.write().await;
        Arc::clone(
            sessions
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(ConversationState::new(self.window)))),
        )
    }

    /// Drop the state for `session_id`, ending the session.
    pub async fn remove(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions are live.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

//! Session store trait and in-memory implementation

use super::model::{Message, Session};
use crate::error::{HwError, Result};
use crate::types::SessionId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Read access to stored sessions and their messages
pub trait SessionStore: Send + Sync {
    /// Load the sessions matching `ids`; unknown ids are skipped
    fn get_sessions(&self, ids: &[SessionId]) -> Result<Vec<Session>>;

    /// Load a session's messages ordered by `created_at` ascending
    fn get_messages(&self, session_id: &SessionId) -> Result<Vec<Message>>;
}

/// In-memory session store
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<SessionId, (Session, Vec<Message>)>>,
    failing: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a session and its messages
    pub fn insert(&self, session: Session, mut messages: Vec<Message>) {
        messages.sort_by_key(|m| m.created_at);
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(session.id.clone(), (session, messages));
        }
    }

    /// Make every subsequent read fail with an upstream error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HwError::Upstream("session store unavailable".to_string()));
        }
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn get_sessions(&self, ids: &[SessionId]) -> Result<Vec<Session>> {
        self.check_available()?;
        let sessions = self
            .sessions
            .read()
            .map_err(|_| HwError::Upstream("session store lock poisoned".to_string()))?;
        Ok(ids
            .iter()
            .filter_map(|id| sessions.get(id).map(|(s, _)| s.clone()))
            .collect())
    }

    fn get_messages(&self, session_id: &SessionId) -> Result<Vec<Message>> {
        self.check_available()?;
        let sessions = self
            .sessions
            .read()
            .map_err(|_| HwError::Upstream("session store lock poisoned".to_string()))?;
        Ok(sessions
            .get(session_id)
            .map(|(_, messages)| messages.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn session(id: &str) -> Session {
        Session::new(
            SessionId(id.to_string()),
            Utc.with_ymd_and_hms(2026, 1, 11, 10, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_get_sessions_skips_unknown_ids() {
        let store = MemoryStore::new();
        store.insert(session("a"), Vec::new());

        let found = store
            .get_sessions(&[SessionId("a".to_string()), SessionId("zzz".to_string())])
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "a");
    }

    #[test]
    fn test_messages_sorted_on_insert() {
        let store = MemoryStore::new();
        let base = Utc.with_ymd_and_hms(2026, 1, 11, 10, 30, 0).unwrap();
        store.insert(
            session("a"),
            vec![
                Message::user("second", base + Duration::minutes(1)),
                Message::user("first", base),
            ],
        );

        let messages = store.get_messages(&SessionId("a".to_string())).unwrap();
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].content, "second");
    }

    #[test]
    fn test_failing_store() {
        let store = MemoryStore::new();
        store.insert(session("a"), Vec::new());
        store.set_failing(true);

        let result = store.get_sessions(&[SessionId("a".to_string())]);
        assert!(matches!(result, Err(HwError::Upstream(_))));
    }
}

//! Conversation session management.
//!
//! Wraps per-conversation dialogue state with an identity and expiry
//! handling so hosts can run several independent chats.

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trailwise_core::types::Timestamp;

use crate::types::DialogueState;

/// One conversation: an id, its start time, and the engine state.
///
/// Each session owns an independent [`DialogueState`]; the engine has no
/// cross-session resource to guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueSession {
    pub id: Uuid,
    pub started_at: Timestamp,
    pub state: DialogueState,
}

/// Creates sessions and decides when they have expired.
pub struct SessionManager {
    /// Session timeout in minutes.
    pub session_timeout_minutes: u32,
}

impl SessionManager {
    pub fn new(session_timeout_minutes: u32) -> Self {
        Self {
            session_timeout_minutes,
        }
    }

    /// Create a fresh conversation session.
    pub fn create_session(&self) -> DialogueSession {
        DialogueSession {
            id: Uuid::new_v4(),
            started_at: Local::now().timestamp(),
            state: DialogueState::new(),
        }
    }

    /// Check whether a session has expired based on the configured timeout.
    pub fn is_expired(&self, session: &DialogueSession) -> bool {
        let now = Local::now().timestamp();
        let timeout_secs = i64::from(self.session_timeout_minutes) * 60;
        now - session.state.last_interaction_at > timeout_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager() -> SessionManager {
        SessionManager::new(30)
    }

    #[test]
    fn test_create_session_has_uuid() {
        let session = make_manager().create_session();
        assert_ne!(session.id, Uuid::nil());
    }

    #[test]
    fn test_create_session_fresh_state() {
        let session = make_manager().create_session();
        assert!(session.state.topic.is_none());
        assert_eq!(session.state.turn_count, 0);
        let now = Local::now().timestamp();
        assert!((session.started_at - now).abs() < 2);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mgr = make_manager();
        let a = mgr.create_session();
        let mut b = mgr.create_session();
        assert_ne!(a.id, b.id);
        b.state.turn_count = 5;
        assert_eq!(a.state.turn_count, 0);
    }

    #[test]
    fn test_session_not_expired() {
        let mgr = make_manager();
        let session = mgr.create_session();
        assert!(!mgr.is_expired(&session));
    }

    #[test]
    fn test_session_expired() {
        let mgr = make_manager();
        let mut session = mgr.create_session();
        session.state.last_interaction_at = Local::now().timestamp() - 31 * 60;
        assert!(mgr.is_expired(&session));
    }

    #[test]
    fn test_session_exactly_at_timeout() {
        let mgr = make_manager();
        let mut session = mgr.create_session();
        // Exactly 30 minutes ago (not expired: > is strict)
        session.state.last_interaction_at = Local::now().timestamp() - 30 * 60;
        assert!(!mgr.is_expired(&session));
    }

    #[test]
    fn test_session_one_second_over_timeout() {
        let mgr = make_manager();
        let mut session = mgr.create_session();
        session.state.last_interaction_at = Local::now().timestamp() - 30 * 60 - 1;
        assert!(mgr.is_expired(&session));
    }

    #[test]
    fn test_session_serde_roundtrip() {
        let session = make_manager().create_session();
        let json = serde_json::to_string(&session).unwrap();
        let back: DialogueSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}

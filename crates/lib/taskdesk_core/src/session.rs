//! In-memory session store.
//!
//! Maps opaque bearer tokens to active sessions with sliding-window
//! idle expiry. Sessions are never persisted — a process restart logs
//! everyone out, which is accepted behavior for a desktop app.
//!
//! Expiry is checked lazily on lookup rather than by a background sweep;
//! the map is bounded by the active user count and eviction happens on
//! the hot path anyway.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};

use crate::models::identity::SystemRole;

/// Bearer token length in alphanumeric chars. 64 chars over a 62-symbol
/// alphabet is ~380 bits of entropy.
const TOKEN_LEN: usize = 64;

/// One live session: token, owner, and the role snapshot taken at login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    /// System roles at session creation. Not refreshed on touch; a role
    /// change takes effect at next login.
    pub roles: Vec<SystemRole>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

/// Token → session map with idle expiry.
///
/// All mutations go through `DashMap`, so concurrent requests touching
/// the same token cannot tear the activity timestamp. Constructed
/// explicitly and injected by the composition root — never a global.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    idle_timeout: Duration,
}

impl SessionStore {
    /// Create a store with the given idle timeout.
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout,
        }
    }

    /// Create a session for `user_id` with the given role snapshot.
    pub fn create_session(&self, user_id: &str, roles: Vec<SystemRole>) -> Session {
        let now = Utc::now();
        let session = Session {
            token: generate_token(),
            user_id: user_id.to_string(),
            roles,
            created_at: now,
            last_activity_at: now,
        };
        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Look up a session without renewing it. Expired entries are
    /// evicted and reported as absent — indistinguishable from a token
    /// that was never issued.
    pub fn get_session(&self, token: &str) -> Option<Session> {
        self.lookup(token, Utc::now(), false)
    }

    /// Look up a session and advance its activity timestamp (sliding
    /// renewal). Same absence semantics as [`get_session`].
    ///
    /// [`get_session`]: SessionStore::get_session
    pub fn touch_session(&self, token: &str) -> Option<Session> {
        self.lookup(token, Utc::now(), true)
    }

    /// Remove a session unconditionally. Idempotent.
    pub fn end_session(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Remove every session belonging to `user_id`. Used on password
    /// change to force re-authentication everywhere.
    pub fn end_sessions_for_user(&self, user_id: &str) {
        self.sessions.retain(|_, s| s.user_id != user_id);
    }

    /// Number of sessions currently held (including not-yet-evicted
    /// expired entries).
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    fn lookup(&self, token: &str, now: DateTime<Utc>, touch: bool) -> Option<Session> {
        if let Some(mut entry) = self.sessions.get_mut(token) {
            if now.signed_duration_since(entry.last_activity_at) > self.idle_timeout {
                drop(entry);
                self.sessions.remove(token);
                return None;
            }
            if touch {
                entry.last_activity_at = now;
            }
            return Some(entry.value().clone());
        }
        None
    }
}

/// Generate a cryptographically random bearer token.
fn generate_token() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Duration::minutes(30))
    }

    #[test]
    fn created_session_is_retrievable() {
        let store = store();
        let session = store.create_session("u1", vec![SystemRole::Viewer]);
        let found = store.get_session(&session.token).expect("session");
        assert_eq!("u1", found.user_id);
        assert_eq!(vec![SystemRole::Viewer], found.roles);
    }

    #[test]
    fn tokens_are_long_and_unique() {
        let store = store();
        let a = store.create_session("u1", vec![]);
        let b = store.create_session("u1", vec![]);
        assert_eq!(TOKEN_LEN, a.token.len());
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn unknown_token_is_absent() {
        let store = store();
        assert!(store.get_session("no-such-token").is_none());
        assert!(store.touch_session("no-such-token").is_none());
    }

    #[test]
    fn end_session_is_idempotent() {
        let store = store();
        let session = store.create_session("u1", vec![]);
        store.end_session(&session.token);
        assert!(store.get_session(&session.token).is_none());
        // Second end is a no-op, not an error.
        store.end_session(&session.token);
        assert!(store.get_session(&session.token).is_none());
    }

    #[test]
    fn end_sessions_for_user_removes_only_that_user() {
        let store = store();
        let a = store.create_session("u1", vec![]);
        let b = store.create_session("u1", vec![]);
        let c = store.create_session("u2", vec![]);
        store.end_sessions_for_user("u1");
        assert!(store.get_session(&a.token).is_none());
        assert!(store.get_session(&b.token).is_none());
        assert!(store.get_session(&c.token).is_some());
    }

    #[test]
    fn expiry_is_measured_from_last_activity() {
        let store = store();
        let session = store.create_session("u1", vec![]);
        let t0 = session.last_activity_at;

        // Just inside the window: still valid, and touch slides it.
        let near_deadline = t0 + Duration::minutes(29);
        assert!(store.lookup(&session.token, near_deadline, true).is_some());

        // The touch above moved the window; the old deadline no longer
        // applies.
        let past_original_deadline = t0 + Duration::minutes(31);
        assert!(
            store
                .lookup(&session.token, past_original_deadline, false)
                .is_some()
        );

        // Past the slid window: expired and evicted.
        let past_slid_deadline = near_deadline + Duration::minutes(31);
        assert!(
            store
                .lookup(&session.token, past_slid_deadline, false)
                .is_none()
        );
        assert_eq!(0, store.active_count());
    }

    #[test]
    fn get_does_not_slide_the_window() {
        let store = store();
        let session = store.create_session("u1", vec![]);
        let t0 = session.last_activity_at;

        // A plain get inside the window must not renew it.
        assert!(
            store
                .lookup(&session.token, t0 + Duration::minutes(29), false)
                .is_some()
        );
        assert!(
            store
                .lookup(&session.token, t0 + Duration::minutes(31), false)
                .is_none()
        );
    }

    #[test]
    fn expired_and_ended_are_indistinguishable_from_never_issued() {
        let store = store();
        let ended = store.create_session("u1", vec![]);
        store.end_session(&ended.token);

        let expired = store.create_session("u1", vec![]);
        let later = expired.last_activity_at + Duration::minutes(31);

        assert!(store.get_session("never-issued").is_none());
        assert!(store.get_session(&ended.token).is_none());
        assert!(store.lookup(&expired.token, later, false).is_none());
    }
}

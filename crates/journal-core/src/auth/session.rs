use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::User;
use crate::storage::KeyValueStore;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key for the JSON-serialized user profile
pub const USER_KEY: &str = "user";

/// Credential and identity of the logged-in user. This is also the shape
/// of a successful `/api/login` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// What `SessionPersistence::load` found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistedSession {
    Present(Session),
    Absent,
    /// Something was stored but it can't be used; the reason is for logs only
    Malformed(String),
}

/// Keeps a serialized copy of the session in a key-value store.
/// Token and user are written and removed together.
pub struct SessionPersistence {
    store: Box<dyn KeyValueStore>,
}

impl SessionPersistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the persisted session. Never fails: read errors and corrupt
    /// data are reported as `Malformed`.
    pub fn load(&self) -> PersistedSession {
        let token = match self.store.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => return PersistedSession::Malformed(format!("Failed to read token: {:#}", e)),
        };
        let user = match self.store.get(USER_KEY) {
            Ok(user) => user,
            Err(e) => return PersistedSession::Malformed(format!("Failed to read user: {:#}", e)),
        };

        match (token, user) {
            (None, None) => PersistedSession::Absent,
            (Some(_), None) => PersistedSession::Malformed("token stored without user".to_string()),
            (None, Some(_)) => PersistedSession::Malformed("user stored without token".to_string()),
            (Some(token), Some(_)) if token.trim().is_empty() => {
                PersistedSession::Malformed("stored token is empty".to_string())
            }
            (Some(token), Some(user)) => match serde_json::from_str::<User>(&user) {
                Ok(user) => PersistedSession::Present(Session { token, user }),
                Err(e) => PersistedSession::Malformed(format!("Failed to parse stored user: {}", e)),
            },
        }
    }

    /// Persist both keys. If the user can't be written the token is removed
    /// again so the store never holds one without the other.
    pub fn save(&self, session: &Session) -> Result<()> {
        let user = serde_json::to_string(&session.user).context("Failed to serialize user")?;

        self.store
            .set(TOKEN_KEY, &session.token)
            .context("Failed to store token")?;

        if let Err(e) = self.store.set(USER_KEY, &user) {
            if let Err(rollback) = self.store.remove(TOKEN_KEY) {
                warn!(error = %rollback, "Failed to roll back token after user write failed");
            }
            return Err(e.context("Failed to store user"));
        }

        debug!(user_id = %session.user.id, "Session persisted");
        Ok(())
    }

    /// Remove both keys. Both removals are attempted even if the first fails.
    pub fn clear(&self) -> Result<()> {
        let token = self.store.remove(TOKEN_KEY).context("Failed to remove token");
        let user = self.store.remove(USER_KEY).context("Failed to remove user");
        token.and(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn session() -> Session {
        Session {
            token: "tok-123".to_string(),
            user: User {
                id: "u1".to_string(),
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = MemoryStore::new();
        let persistence = SessionPersistence::new(Box::new(store.clone()));

        persistence.save(&session()).expect("Failed to save session");
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-123"));
        assert_eq!(persistence.load(), PersistedSession::Present(session()));
    }

    #[test]
    fn test_load_absent() {
        let persistence = SessionPersistence::new(Box::new(MemoryStore::new()));
        assert_eq!(persistence.load(), PersistedSession::Absent);
    }

    #[test]
    fn test_load_malformed_variants() {
        let cases: Vec<(Option<&str>, Option<&str>)> = vec![
            (Some("tok"), None),
            (None, Some(r#"{"id":"u1","name":"Ana","email":"a@b.c"}"#)),
            (Some("tok"), Some("not json")),
            (Some("tok"), Some(r#"{"name":"missing id"}"#)),
            (Some("   "), Some(r#"{"id":"u1","name":"Ana","email":"a@b.c"}"#)),
        ];

        for (token, user) in cases {
            let store = MemoryStore::new();
            if let Some(token) = token {
                store.set(TOKEN_KEY, token).unwrap();
            }
            if let Some(user) = user {
                store.set(USER_KEY, user).unwrap();
            }
            let persistence = SessionPersistence::new(Box::new(store));
            assert!(
                matches!(persistence.load(), PersistedSession::Malformed(_)),
                "expected malformed for token={:?} user={:?}",
                token,
                user
            );
        }
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let store = MemoryStore::new();
        let persistence = SessionPersistence::new(Box::new(store.clone()));
        persistence.save(&session()).unwrap();

        persistence.clear().expect("Failed to clear session");
        assert!(store.is_empty());

        // Clearing again is fine
        persistence.clear().expect("Second clear should succeed");
    }
}

//! Session store: the single authority for login state and entries.
//!
//! `SessionStore` owns the session, the newest-first entry list, the draft
//! of the entry being written and which auth form is showing. Front ends
//! call its operations and re-render from `snapshot()`.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::api::{ApiError, JournalApi};
use crate::auth::{PersistedSession, Session, SessionPersistence};
use crate::config::{Config, UnauthorizedPolicy};
use crate::error::{StoreError, LOGIN_FAILED, REGISTRATION_FAILED};
use crate::models::{Entries, Entry, User};
use crate::storage::KeyValueStore;

// ============================================================================
// State Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

/// Which auth form the front end should present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthView {
    #[default]
    Login,
    Register,
}

impl AuthView {
    pub fn toggle(&self) -> Self {
        match self {
            AuthView::Login => AuthView::Register,
            AuthView::Register => AuthView::Login,
        }
    }
}

/// Behaviour switches for the store
#[derive(Debug, Clone, Copy, Default)]
pub struct StorePolicy {
    pub unauthorized: UnauthorizedPolicy,
}

impl From<&Config> for StorePolicy {
    fn from(config: &Config) -> Self {
        Self {
            unauthorized: config.unauthorized_policy,
        }
    }
}

/// Everything a front end needs to render
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub state: SessionState,
    pub user: Option<&'a User>,
    pub entries: &'a [Entry],
    pub draft: &'a str,
    pub auth_view: AuthView,
}

// ============================================================================
// SessionStore
// ============================================================================

pub struct SessionStore {
    api: Arc<dyn JournalApi>,
    persistence: SessionPersistence,
    policy: StorePolicy,

    session: Option<Session>,
    entries: Entries,
    draft: String,
    auth_view: AuthView,
}

impl SessionStore {
    /// Create a logged-out store. Call `restore_session` to pick up a
    /// session left by a previous run.
    pub fn new(api: Arc<dyn JournalApi>, storage: Box<dyn KeyValueStore>, policy: StorePolicy) -> Self {
        Self {
            api,
            persistence: SessionPersistence::new(storage),
            policy,
            session: None,
            entries: Entries::new(),
            draft: String::new(),
            auth_view: AuthView::default(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn auth_view(&self) -> AuthView {
        self.auth_view
    }

    pub fn toggle_auth_view(&mut self) -> AuthView {
        self.auth_view = self.auth_view.toggle();
        self.auth_view
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.state(),
            user: self.user(),
            entries: self.entries.as_slice(),
            draft: &self.draft,
            auth_view: self.auth_view,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Pick up the session persisted by a previous run without contacting
    /// the server. Missing or corrupt data leaves the store logged out;
    /// corrupt data is cleared so token and user are stored together again.
    pub fn load_session(&mut self) -> SessionState {
        match self.persistence.load() {
            PersistedSession::Present(session) => {
                info!(user_id = %session.user.id, "Restored persisted session");
                self.session = Some(session);
            }
            PersistedSession::Absent => {
                debug!("No persisted session");
            }
            PersistedSession::Malformed(reason) => {
                warn!(reason = %reason, "Ignoring malformed persisted session");
                if let Err(e) = self.persistence.clear() {
                    warn!(error = %format!("{:#}", e), "Failed to clear malformed session");
                }
            }
        }
        self.state()
    }

    /// `load_session`, then load the restored session's entries. A failed
    /// fetch keeps the session.
    pub async fn restore_session(&mut self) -> SessionState {
        if self.load_session() == SessionState::LoggedIn {
            self.fetch_entries_keeping_session().await;
        }
        self.state()
    }

    /// Create an account. Success does not log in; it switches the auth
    /// view back to the login form.
    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> Result<(), StoreError> {
        match self.api.register(name, email, password).await {
            Ok(()) => {
                info!(email = email, "Registration successful");
                self.auth_view = AuthView::Login;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                Err(StoreError::auth(&e, REGISTRATION_FAILED))
            }
        }
    }

    /// Log in, persist the session and load entries. On failure the
    /// current session is left alone.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), StoreError> {
        let session = match self.api.login(email, password).await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "Login failed");
                return Err(StoreError::auth(&e, LOGIN_FAILED));
            }
        };

        if let Err(e) = self.persistence.save(&session) {
            // A previous account's session must not be restored next run
            warn!(error = %format!("{:#}", e), "Failed to save session");
            if let Err(e) = self.persistence.clear() {
                warn!(error = %format!("{:#}", e), "Failed to clear stale session");
            }
        }

        info!(user_id = %session.user.id, "Login successful");
        self.session = Some(session);
        self.entries.clear();
        self.fetch_entries_keeping_session().await;
        Ok(())
    }

    /// Forget the session locally. Never fails and makes no remote call.
    pub fn logout(&mut self) {
        if let Err(e) = self.persistence.clear() {
            warn!(error = %format!("{:#}", e), "Failed to clear persisted session");
        }
        if let Some(session) = self.session.take() {
            info!(user_id = %session.user.id, "Logged out");
        }
        self.entries.clear();
        self.draft.clear();
    }

    // =========================================================================
    // Entries
    // =========================================================================

    /// Replace the entry list with the server's listing. On failure the
    /// list is kept as it was.
    pub async fn fetch_entries(&mut self, token: &str) -> Result<usize, StoreError> {
        match self.api.list_entries(token).await {
            Ok(entries) => {
                let count = entries.len();
                self.entries.replace(entries);
                debug!(count = count, "Entries fetched");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch entries");
                self.on_request_failed(token, &e);
                Err(e.into())
            }
        }
    }

    /// Fetch for the current session; failures are already logged by
    /// `fetch_entries` and leave the session in place.
    async fn fetch_entries_keeping_session(&mut self) {
        let Some(token) = self.token().map(str::to_string) else {
            return;
        };
        if self.fetch_entries(&token).await.is_err() {
            debug!("Entries unavailable; keeping session");
        }
    }

    /// Fetch entries with the current session's token
    pub async fn refresh(&mut self) -> Result<usize, StoreError> {
        let token = self.token().map(str::to_string).ok_or(StoreError::NotLoggedIn)?;
        self.fetch_entries(&token).await
    }

    /// Make `text` the draft and submit it. See `submit_draft`.
    pub async fn add_entry(&mut self, text: impl Into<String>) -> Result<Option<Entry>, StoreError> {
        self.draft = text.into();
        self.submit_draft().await
    }

    /// Submit the draft as a new entry.
    ///
    /// Blank drafts are ignored (`Ok(None)`, no request). On success the
    /// server's entry goes to the front of the list and the draft is
    /// cleared; on failure the draft is kept so it can be retried.
    pub async fn submit_draft(&mut self) -> Result<Option<Entry>, StoreError> {
        if self.draft.trim().is_empty() {
            return Ok(None);
        }
        let token = self.token().map(str::to_string).ok_or(StoreError::NotLoggedIn)?;

        match self.api.create_entry(&token, &self.draft).await {
            Ok(entry) => {
                info!(entry_id = %entry.id, "Entry added");
                self.entries.prepend(entry.clone());
                self.draft.clear();
                Ok(Some(entry))
            }
            Err(e) => {
                warn!(error = %e, "Failed to add entry");
                self.on_request_failed(&token, &e);
                Err(e.into())
            }
        }
    }

    /// Apply the unauthorized policy when the current token is rejected
    fn on_request_failed(&mut self, token: &str, err: &ApiError) {
        if !err.is_unauthorized() || self.token() != Some(token) {
            return;
        }
        match self.policy.unauthorized {
            UnauthorizedPolicy::KeepSession => {
                debug!("Token rejected; keeping session");
            }
            UnauthorizedPolicy::Logout => {
                warn!("Token rejected; logging out");
                self.logout();
            }
        }
    }
}

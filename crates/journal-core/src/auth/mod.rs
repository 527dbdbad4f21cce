//! Authentication module for the logged-in session.
//!
//! This module provides:
//! - `Session`: bearer token plus the profile it belongs to
//! - `SessionPersistence`: reads and writes the session through a
//!   `KeyValueStore` under the `token` and `user` keys

pub mod session;

pub use session::{PersistedSession, Session, SessionPersistence, TOKEN_KEY, USER_KEY};

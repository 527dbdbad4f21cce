//! Core library for the journal client.
//!
//! - `api`: REST client for the journal service and the `JournalApi` seam
//! - `auth`: the authenticated session and its persistence
//! - `storage`: durable key-value backends (file, OS keychain, memory)
//! - `store`: `SessionStore`, the single authority for login state and entries
//! - `config`: user configuration and directory resolution

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;
pub mod utils;

pub use api::{ApiClient, ApiError, JournalApi};
pub use auth::{Session, SessionPersistence};
pub use config::{Config, StorageBackend, UnauthorizedPolicy};
pub use error::StoreError;
pub use models::{Author, AuthorRef, Entries, Entry, User};
pub use storage::{FileStore, KeyValueStore, KeyringStore, MemoryStore};
pub use store::{AuthView, SessionState, SessionStore, Snapshot, StorePolicy};

//! REST API client module for the journal service.
//!
//! `JournalApi` is the seam the session store talks to; `ApiClient` is the
//! HTTP implementation. Entry endpoints authenticate with a bearer token
//! obtained from `/api/login`.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::auth::Session;
use crate::models::Entry;

pub use client::ApiClient;
pub use error::ApiError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Remote operations the journal service offers.
#[async_trait]
pub trait JournalApi: Send + Sync {
    /// Create an account. The response body is ignored.
    async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<()>;

    /// Exchange credentials for a bearer token and the user's profile.
    async fn login(&self, email: &str, password: &str) -> ApiResult<Session>;

    /// All entries visible to the token's owner, newest first.
    async fn list_entries(&self, token: &str) -> ApiResult<Vec<Entry>>;

    /// Create an entry and return it as stored by the server.
    async fn create_entry(&self, token: &str, text: &str) -> ApiResult<Entry>;
}

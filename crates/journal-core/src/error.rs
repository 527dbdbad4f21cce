use thiserror::Error;

use crate::api::ApiError;

/// Fallback shown when a failed login carries no server message
pub const LOGIN_FAILED: &str = "Login failed";

/// Fallback shown when a failed registration carries no server message
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Errors surfaced by `SessionStore` operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Login or registration was refused; the message is meant for the user
    #[error("{0}")]
    Auth(String),

    /// An entry operation needs a session and there is none
    #[error("Not logged in")]
    NotLoggedIn,

    /// The request failed in transit or the response was unusable
    #[error(transparent)]
    Transport(#[from] ApiError),
}

impl StoreError {
    /// Auth failure carrying the server's message, or `fallback` without one
    pub fn auth(err: &ApiError, fallback: &str) -> Self {
        StoreError::Auth(err.server_message().unwrap_or(fallback).to_string())
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Auth(message) => message.clone(),
            StoreError::NotLoggedIn => "Not logged in".to_string(),
            StoreError::Transport(e) if e.is_unauthorized() => {
                "Session expired. Please log in again.".to_string()
            }
            StoreError::Transport(ApiError::NetworkError(_)) => {
                "Network error. Check your connection.".to_string()
            }
            StoreError::Transport(ApiError::RateLimited) => {
                "Server is busy. Please wait a moment and try again.".to_string()
            }
            StoreError::Transport(e) => format!("Error: {}", e),
        }
    }
}

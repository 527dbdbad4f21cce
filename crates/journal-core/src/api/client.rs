//! API client for communicating with the journal REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{ApiError, ApiResult, JournalApi};
use crate::auth::Session;
use crate::config::Config;
use crate::models::Entry;

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateEntryRequest<'a> {
    text: &'a str,
}

/// HTTP client for the journal service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client using the transport's default timeout behaviour
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let base_url: String = base_url.into();
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from the resolved base URL and timeout in `config`
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        Self::with_timeout(config.base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(response: Response) -> ApiResult<Option<Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request, retrying with exponential backoff while rate limited.
    /// `build` is called once per attempt since a RequestBuilder is consumed on send.
    async fn send<F>(&self, url: &str, build: F) -> ApiResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            debug!(url = url, attempt = retries + 1, "Sending request");
            let response = build().send().await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    /// Read the body and decode it, reporting decode failures with the URL
    async fn parse_json<T: DeserializeOwned>(url: &str, response: Response) -> ApiResult<T> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: &str) -> ApiResult<T> {
        let url = self.url(path);
        let response = self
            .send(&url, || self.client.get(&url).bearer_auth(token))
            .await?;
        Self::parse_json(&url, response).await
    }

    async fn post<B: Serialize>(&self, path: &str, token: Option<&str>, body: &B) -> ApiResult<Response> {
        let url = self.url(path);
        self.send(&url, || {
            let request = self.client.post(&url).json(body);
            match token {
                Some(token) => request.bearer_auth(token),
                None => request,
            }
        })
        .await
    }
}

#[async_trait]
impl JournalApi for ApiClient {
    async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<()> {
        let body = RegisterRequest { name, email, password };
        self.post("/api/register", None, &body).await?;
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> ApiResult<Session> {
        let body = LoginRequest { email, password };
        let response = self.post("/api/login", None, &body).await?;
        let session: Session = Self::parse_json(&self.url("/api/login"), response).await?;

        if session.token.is_empty() {
            return Err(ApiError::InvalidResponse("Login response contained an empty token".to_string()));
        }
        Ok(session)
    }

    async fn list_entries(&self, token: &str) -> ApiResult<Vec<Entry>> {
        let items: Vec<serde_json::Value> = self.get("/api/entries", token).await?;
        Ok(Entry::decode_list(items))
    }

    async fn create_entry(&self, token: &str, text: &str) -> ApiResult<Entry> {
        let body = CreateEntryRequest { text };
        let response = self.post("/api/entries", Some(token), &body).await?;
        Self::parse_json(&self.url("/api/entries"), response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("https://journal.example.com/").expect("Failed to build client");
        assert_eq!(client.base_url(), "https://journal.example.com");
        assert_eq!(client.url("/api/entries"), "https://journal.example.com/api/entries");
    }

    #[test]
    fn test_request_bodies_match_wire_contract() {
        let login = serde_json::to_value(LoginRequest {
            email: "ana@example.com",
            password: "secret",
        })
        .expect("Failed to serialize login request");
        assert_eq!(login, serde_json::json!({"email": "ana@example.com", "password": "secret"}));

        let create = serde_json::to_value(CreateEntryRequest { text: "hello" })
            .expect("Failed to serialize entry request");
        assert_eq!(create, serde_json::json!({"text": "hello"}));
    }
}

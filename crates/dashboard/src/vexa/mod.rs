//! Vexa platform API clients.
//!
//! Two upstream collaborators, both plain JSON-over-HTTP:
//!
//! - **Identity store** ([`AdminClient`]): user accounts and bearer tokens,
//!   keyed by an admin-level `X-Admin-API-Key` that never reaches the browser.
//! - **Transcription API** ([`VexaApiClient`]): meetings and transcripts,
//!   keyed per-request by the user's bearer token as `X-API-Key`.
//!
//! Neither client retries: a failed upstream call surfaces immediately and
//! the caller re-issues the action. Requests inherit a conservative 10 second
//! client-level timeout; reachability probes use an explicit 5 second one.

mod api;
pub mod types;

pub use api::{ProxyResponse, VexaApiClient};
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use vexa_core::{Email, UserId};

use crate::config::VexaAdminConfig;

/// Header carrying the identity-store admin key.
pub const ADMIN_KEY_HEADER: &str = "X-Admin-API-Key";

/// Default timeout for upstream calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for reachability probes.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when interacting with the Vexa platform APIs.
#[derive(Debug, Error)]
pub enum VexaError {
    /// HTTP request failed (connect, timeout, protocol).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unauthorized (invalid or revoked key).
    #[error("Unauthorized: upstream rejected the credential")]
    Unauthorized,

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl VexaError {
    /// Whether this error indicates the upstream is unreachable (as opposed
    /// to reachable-but-rejecting). Unreachable errors map to 503 and are
    /// retryable by the caller.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_connect() || err.is_timeout(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Extract an error from a non-success upstream response.
///
/// The upstream reports failures as `{"detail": "..."}`; fall back to the
/// raw body when that shape is missing.
async fn response_error(response: reqwest::Response) -> VexaError {
    let status = response.status().as_u16();
    let message = match response.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("detail")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| body.to_string(), str::to_owned),
        Err(_) => "no response body".to_string(),
    };

    match status {
        401 | 403 => VexaError::Unauthorized,
        404 => VexaError::NotFound(message),
        _ => VexaError::Api { status, message },
    }
}

// =============================================================================
// AdminClient
// =============================================================================

/// Client for the Vexa identity store.
///
/// All operations are keyed by the admin API key configured server-side.
/// This layer reads and creates identities; it never mutates them.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminClient {
    /// Create a new identity-store client.
    ///
    /// # Errors
    ///
    /// Returns error if the admin key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &VexaAdminConfig) -> Result<Self, VexaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ADMIN_KEY_HEADER,
            HeaderValue::from_str(config.api_key.expose_secret())
                .map_err(|e| VexaError::Parse(format!("invalid admin API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                base_url: config.url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Look up a user by email. `Ok(None)` means the identity does not exist.
    ///
    /// # Errors
    ///
    /// Returns error on network failure or a non-404 upstream error.
    pub async fn find_user_by_email(&self, email: &Email) -> Result<Option<VexaUser>, VexaError> {
        let url = format!(
            "{}/admin/users/email/{}",
            self.inner.base_url,
            urlencoding::encode(email.as_str())
        );
        let response = self.inner.client.get(&url).send().await?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        let user = response
            .json::<VexaUser>()
            .await
            .map_err(|e| VexaError::Parse(e.to_string()))?;
        Ok(Some(user))
    }

    /// Create a new user identity.
    ///
    /// # Errors
    ///
    /// Returns error on network failure or upstream rejection.
    pub async fn create_user(
        &self,
        email: &Email,
        name: Option<&str>,
    ) -> Result<VexaUser, VexaError> {
        let url = format!("{}/admin/users", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(&url)
            .json(&serde_json::json!({ "email": email, "name": name }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        response
            .json::<VexaUser>()
            .await
            .map_err(|e| VexaError::Parse(e.to_string()))
    }

    /// Fetch a user's detail record.
    ///
    /// # Errors
    ///
    /// Returns error on network failure, 404, or upstream rejection.
    pub async fn get_user(&self, id: UserId) -> Result<VexaUser, VexaError> {
        let url = format!("{}/admin/users/{id}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        response
            .json::<VexaUser>()
            .await
            .map_err(|e| VexaError::Parse(e.to_string()))
    }

    /// Mint a fresh bearer token for a user.
    ///
    /// # Errors
    ///
    /// Returns error on network failure or upstream rejection.
    pub async fn create_token(&self, user_id: UserId) -> Result<ApiToken, VexaError> {
        let url = format!("{}/admin/users/{user_id}/tokens", self.inner.base_url);
        let response = self.inner.client.post(&url).send().await?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        response
            .json::<ApiToken>()
            .await
            .map_err(|e| VexaError::Parse(e.to_string()))
    }

    /// Bounded reachability probe, used before issuing magic links and by
    /// the readiness endpoint.
    ///
    /// # Errors
    ///
    /// Returns error when the identity store cannot be reached within the
    /// probe timeout or rejects the admin key.
    pub async fn ping(&self) -> Result<(), VexaError> {
        let url = format!("{}/admin/users?skip=0&limit=1", self.inner.base_url);
        let response = self
            .inner
            .client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        Ok(())
    }
}

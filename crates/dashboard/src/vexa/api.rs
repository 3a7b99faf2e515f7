//! Transcription API client.

use std::sync::Arc;

use serde_json::Value;

use super::{MeetingsResponse, REQUEST_TIMEOUT, VexaError, response_error, types::Meeting};
use crate::config::VexaApiConfig;

/// Header carrying the user's bearer token.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// A relayed upstream response: status code plus JSON body.
///
/// Non-JSON and 204 responses relay with an empty body, matching what the
/// browser-facing proxy returns verbatim.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    /// Upstream status code.
    pub status: u16,
    /// Upstream JSON body, when there was one.
    pub body: Option<Value>,
}

/// Client for the Vexa transcription API.
///
/// Carries no credential of its own: every call takes the user's bearer
/// token, which the proxy layer injects from the session cookie.
#[derive(Clone)]
pub struct VexaApiClient {
    inner: Arc<VexaApiClientInner>,
}

struct VexaApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl VexaApiClient {
    /// Create a new transcription API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &VexaApiConfig) -> Result<Self, VexaError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(VexaApiClientInner {
                client,
                base_url: config.api_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Lightweight check that the upstream still accepts a bearer token.
    ///
    /// `Ok(false)` means the upstream rejected the credential (revoked or
    /// never valid); the caller clears the stale cookie.
    ///
    /// # Errors
    ///
    /// Returns error on network failure or an unexpected upstream error.
    pub async fn validate_key(&self, api_key: &str) -> Result<bool, VexaError> {
        let url = format!("{}/meetings", self.inner.base_url);
        let response = self
            .inner
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        match response.status().as_u16() {
            200..=299 => Ok(true),
            401 | 403 => Ok(false),
            _ => Err(response_error(response).await),
        }
    }

    /// List the meetings visible to a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`VexaError::Unauthorized`] when the token is rejected, or an
    /// error on network failure.
    pub async fn list_meetings(&self, api_key: &str) -> Result<Vec<Meeting>, VexaError> {
        let url = format!("{}/meetings", self.inner.base_url);
        let response = self
            .inner
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        let body = response
            .json::<MeetingsResponse>()
            .await
            .map_err(|e| VexaError::Parse(e.to_string()))?;
        Ok(body.meetings)
    }

    /// Forward an arbitrary request to the upstream API.
    ///
    /// Method, path, query string, body, and the caller's content type relay
    /// verbatim; the only change is the injected `X-API-Key` header. The
    /// upstream's status code and JSON body come back unchanged; 204 and
    /// non-JSON responses relay with an empty body.
    ///
    /// # Errors
    ///
    /// Returns error only on network failure: upstream error statuses are
    /// relayed, not translated.
    pub async fn forward(
        &self,
        method: reqwest::Method,
        path_and_query: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        api_key: &str,
    ) -> Result<ProxyResponse, VexaError> {
        let url = format!(
            "{}/{}",
            self.inner.base_url,
            path_and_query.trim_start_matches('/')
        );

        let mut request = self
            .inner
            .client
            .request(method, &url)
            .header(API_KEY_HEADER, api_key);
        if !body.is_empty() {
            // Requests without an explicit content type are JSON in practice.
            request = request
                .header("Content-Type", content_type.unwrap_or("application/json"))
                .body(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();

        let is_json = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let body = if status == 204 || !is_json {
            None
        } else {
            // Tolerate empty JSON bodies from the upstream
            response.json::<Value>().await.ok()
        };

        Ok(ProxyResponse { status, body })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_and_trims_base_url() {
        let config = VexaApiConfig {
            api_url: "http://localhost:8000/".to_string(),
            ws_url: None,
        };
        let client = VexaApiClient::new(&config).unwrap();
        assert_eq!(client.inner.base_url, "http://localhost:8000");
    }
}

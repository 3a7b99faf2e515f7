//! Process-wide runtime settings for the browser.
//!
//! The React frontend learns the streaming-gateway and API addresses at
//! runtime instead of build time by calling `/api/config`. The derived
//! settings are memoized once per process (init-once, read-many, safe for
//! concurrent readers); a failed derivation is retried on the next request,
//! and a restart is the only refresh mechanism after success.

use tokio::sync::OnceCell;
use url::Url;

use crate::config::{ConfigError, VexaApiConfig};

static RUNTIME_SETTINGS: OnceCell<RuntimeSettings> = OnceCell::const_new();

/// Non-sensitive runtime settings exposed to the browser.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RuntimeSettings {
    /// Streaming gateway address.
    #[serde(rename = "wsUrl")]
    pub ws_url: String,
    /// Transcription API address (reached through the proxy).
    #[serde(rename = "apiUrl")]
    pub api_url: String,
}

impl RuntimeSettings {
    /// Derive the settings from the server configuration.
    ///
    /// When `VEXA_WS_URL` is not set the gateway address derives from the
    /// API URL by swapping the scheme to `ws`/`wss` and appending `/ws`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the API URL cannot be parsed.
    pub fn derive(vexa: &VexaApiConfig) -> Result<Self, ConfigError> {
        let ws_url = match &vexa.ws_url {
            Some(explicit) => explicit.clone(),
            None => derive_ws_url(&vexa.api_url)?,
        };

        Ok(Self {
            ws_url,
            api_url: vexa.api_url.clone(),
        })
    }

    /// Get the memoized process-wide settings, deriving them on first use.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when derivation fails; the next call retries.
    pub async fn get(vexa: &VexaApiConfig) -> Result<&'static Self, ConfigError> {
        RUNTIME_SETTINGS
            .get_or_try_init(|| async { Self::derive(vexa) })
            .await
    }
}

/// Swap an HTTP API URL for its websocket counterpart.
fn derive_ws_url(api_url: &str) -> Result<String, ConfigError> {
    let mut url = Url::parse(api_url)
        .map_err(|e| ConfigError::InvalidEnvVar("VEXA_API_URL".to_string(), e.to_string()))?;

    let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
    url.set_scheme(scheme).map_err(|()| {
        ConfigError::InvalidEnvVar(
            "VEXA_API_URL".to_string(),
            "cannot derive websocket scheme".to_string(),
        )
    })?;

    let joined = url.join("ws").map_err(|e| {
        ConfigError::InvalidEnvVar("VEXA_API_URL".to_string(), e.to_string())
    })?;
    Ok(joined.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_prefers_explicit_ws_url() {
        let vexa = VexaApiConfig {
            api_url: "http://localhost:8000".to_string(),
            ws_url: Some("wss://stream.vexa.ai/ws".to_string()),
        };
        let settings = RuntimeSettings::derive(&vexa).unwrap();
        assert_eq!(settings.ws_url, "wss://stream.vexa.ai/ws");
        assert_eq!(settings.api_url, "http://localhost:8000");
    }

    #[test]
    fn test_derive_ws_url_from_http() {
        assert_eq!(
            derive_ws_url("http://localhost:8000").unwrap(),
            "ws://localhost:8000/ws"
        );
    }

    #[test]
    fn test_derive_ws_url_from_https() {
        assert_eq!(
            derive_ws_url("https://api.vexa.ai/").unwrap(),
            "wss://api.vexa.ai/ws"
        );
    }

    #[test]
    fn test_derive_ws_url_invalid() {
        assert!(derive_ws_url("not a url").is_err());
    }

    #[test]
    fn test_serialized_field_names_match_browser_contract() {
        let settings = RuntimeSettings {
            ws_url: "ws://localhost:8000/ws".to_string(),
            api_url: "http://localhost:8000".to_string(),
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert!(json.get("wsUrl").is_some());
        assert!(json.get("apiUrl").is_some());
    }
}

//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DASHBOARD_BASE_URL` - Public URL for the dashboard (magic links point here)
//! - `DASHBOARD_SESSION_SECRET` - Magic-link signing secret (min 32 chars, high entropy)
//! - `VEXA_API_URL` - Upstream transcription API base URL
//!
//! ## Optional
//! - `DASHBOARD_HOST` - Bind address (default: 127.0.0.1)
//! - `DASHBOARD_PORT` - Listen port (default: 3000)
//! - `DASHBOARD_COOKIE_DOMAIN` - Shared cookie domain for cross-subdomain SSO
//! - `VEXA_WS_URL` - Streaming gateway URL (default: derived from `VEXA_API_URL`)
//! - `VEXA_ADMIN_API_URL` - Identity store base URL
//! - `VEXA_ADMIN_API_KEY` - Identity store admin key (never sent to the browser)
//! - `ALLOWED_EMAIL_DOMAINS` - Comma-separated registration allow-list
//! - `INVITE_ONLY` - When "true", existing users only (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! ## Optional (SMTP - enables magic-link login instead of direct login)
//! - `SMTP_HOST` - SMTP server hostname
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `SMTP_USERNAME` - SMTP authentication username
//! - `SMTP_PASSWORD` - SMTP authentication password
//! - `SMTP_FROM` - Email sender address
//!
//! The identity-store variables are intentionally optional at startup: their
//! absence is a per-request configuration error (503 on the login path), not
//! a process-fatal one.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use vexa_core::Email;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Dashboard application configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the dashboard
    pub base_url: String,
    /// Magic-link signing secret
    pub session_secret: SecretString,
    /// Shared cookie domain for cross-subdomain SSO
    pub cookie_domain: Option<String>,
    /// Upstream Vexa API configuration
    pub vexa: VexaApiConfig,
    /// Identity store configuration (absent: login path returns 503)
    pub admin: Option<VexaAdminConfig>,
    /// Registration policy for new identities
    pub registration: RegistrationPolicy,
    /// SMTP configuration (absent: direct login, no magic links)
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

/// Upstream transcription API configuration.
#[derive(Debug, Clone)]
pub struct VexaApiConfig {
    /// Transcription API base URL
    pub api_url: String,
    /// Streaming gateway URL override
    pub ws_url: Option<String>,
}

/// Identity store configuration.
///
/// Implements `Debug` manually to redact the admin key.
#[derive(Clone)]
pub struct VexaAdminConfig {
    /// Identity store base URL
    pub url: String,
    /// Admin API key (full identity-store access)
    pub api_key: SecretString,
}

impl std::fmt::Debug for VexaAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VexaAdminConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// SMTP configuration for outbound email.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

/// Policy deciding which emails may register a new identity.
///
/// Existing users are never re-checked against the allow-list; the policy
/// gates creation only.
#[derive(Debug, Clone, Default)]
pub struct RegistrationPolicy {
    /// When set, new identities must use one of these domains (lowercase).
    pub allowed_domains: Option<Vec<String>>,
    /// When true, no new identities are created at all.
    pub invite_only: bool,
}

impl RegistrationPolicy {
    /// Whether `email` may register, given whether it already exists upstream.
    #[must_use]
    pub fn allows(&self, email: &Email, user_exists: bool) -> bool {
        if user_exists {
            return true;
        }
        if self.invite_only {
            return false;
        }
        match &self.allowed_domains {
            Some(domains) => {
                let domain = email.domain().to_lowercase();
                domains.iter().any(|allowed| *allowed == domain)
            }
            None => true,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation (placeholder detection,
    /// entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("DASHBOARD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("DASHBOARD_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("DASHBOARD_BASE_URL")?;
        let session_secret = get_validated_secret("DASHBOARD_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "DASHBOARD_SESSION_SECRET")?;
        let cookie_domain = get_optional_env("DASHBOARD_COOKIE_DOMAIN");

        let vexa = VexaApiConfig {
            api_url: get_required_env("VEXA_API_URL")?,
            ws_url: get_optional_env("VEXA_WS_URL"),
        };
        let admin = VexaAdminConfig::from_env();
        let registration = RegistrationPolicy::from_env()?;
        let email = EmailConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            cookie_domain,
            vexa,
            admin,
            registration,
            email,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl VexaAdminConfig {
    /// Present only when both the URL and the key are configured.
    fn from_env() -> Option<Self> {
        let url = get_optional_env("VEXA_ADMIN_API_URL")?;
        let api_key = get_optional_env("VEXA_ADMIN_API_KEY")?;
        Some(Self {
            url,
            api_key: SecretString::from(api_key),
        })
    }
}

impl EmailConfig {
    /// Present only when `SMTP_HOST` is set; the other SMTP variables are
    /// then required.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };
        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;
        let smtp_username = get_required_env("SMTP_USERNAME")?;
        let smtp_password = get_required_secret("SMTP_PASSWORD")?;
        let from_address = get_required_env("SMTP_FROM")?;

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_address,
        }))
    }
}

impl RegistrationPolicy {
    fn from_env() -> Result<Self, ConfigError> {
        let allowed_domains = get_optional_env("ALLOWED_EMAIL_DOMAINS").map(|raw| {
            raw.split(',')
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect::<Vec<_>>()
        });
        let invite_only = match get_env_or_default("INVITE_ONLY", "false").as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" | "" => false,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "INVITE_ONLY".to_string(),
                    format!("expected true/false, got {other}"),
                ));
            }
        };
        Ok(Self {
            allowed_domains,
            invite_only,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::error::AppError;
use crate::services::EmailService;
use crate::vexa::{AdminClient, VexaApiClient, VexaError};

/// Error constructing shared state at startup.
#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error("failed to build platform API client: {0}")]
    Client(#[from] VexaError),
    #[error("failed to build SMTP transport: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Optional members reflect deployment modes:
/// the identity-store client is absent when the admin API is not configured,
/// and the email service is absent when no SMTP host is set (direct-login
/// mode). Handlers that need an absent member fail that request with 503,
/// the process itself stays up.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    admin: Option<AdminClient>,
    api: VexaApiClient,
    email: Option<EmailService>,
}

impl AppState {
    /// Create a new application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client or SMTP transport cannot be
    /// constructed.
    pub fn new(config: DashboardConfig) -> Result<Self, StateInitError> {
        let admin = config.admin.as_ref().map(AdminClient::new).transpose()?;
        let api = VexaApiClient::new(&config.vexa)?;
        let email = config.email.as_ref().map(EmailService::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                admin,
                api,
                email,
            }),
        })
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Get the identity-store client, or a 503 if the admin API is not
    /// configured for this deployment.
    pub fn admin(&self) -> Result<&AdminClient, AppError> {
        self.inner.admin.as_ref().ok_or_else(|| {
            AppError::Configuration("identity store is not configured".to_string())
        })
    }

    /// Get a reference to the platform API client.
    #[must_use]
    pub fn api(&self) -> &VexaApiClient {
        &self.inner.api
    }

    /// Get the email service, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// Whether this deployment sends magic-link emails. When false, login
    /// issues the session directly from the email address.
    #[must_use]
    pub fn magic_link_enabled(&self) -> bool {
        self.inner.email.is_some()
    }
}

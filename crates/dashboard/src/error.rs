//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; every handler maps each failure to exactly one
//! error kind at its own boundary, and every failure path produces a
//! structured `{error, code?}` JSON payload. Internal details stay in
//! server logs and never reach the client beyond a safe message string.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::email::EmailError;
use crate::vexa::VexaError;

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input from the client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or rejected credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credential present but not permitted.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Authentication flow failed (token or registration policy).
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Outbound email failed.
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// Upstream platform API failed.
    #[error("Upstream error: {0}")]
    Upstream(#[from] VexaError),

    /// A required server secret or URL is absent. Fatal for the request,
    /// not for the process.
    #[error("Not configured: {0}")]
    Configuration(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Structured error payload returned to the browser.
///
/// The UI treats an unrecognized `code` the same as a generic failure.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl AppError {
    /// HTTP status for this error kind.
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::TokenExpired | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::RegistrationClosed | AuthError::DomainNotAllowed(_) => {
                    StatusCode::FORBIDDEN
                }
                AuthError::TokenEncode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Email(err) => match err {
                EmailError::Connect(_) => StatusCode::SERVICE_UNAVAILABLE,
                EmailError::Auth(_) | EmailError::Send(_) => StatusCode::BAD_GATEWAY,
                EmailError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
                EmailError::MessageBuild(_) | EmailError::Template(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Upstream(err) => match err {
                VexaError::Unauthorized => StatusCode::UNAUTHORIZED,
                VexaError::NotFound(_) => StatusCode::NOT_FOUND,
                err if err.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the browser UI.
    fn code(&self) -> Option<&'static str> {
        match self {
            Self::BadRequest(_) => Some("invalid_input"),
            Self::Unauthorized(_) => Some("unauthorized"),
            Self::Forbidden(_) => Some("forbidden"),
            Self::Auth(err) => Some(match err {
                AuthError::InvalidEmail(_) => "invalid_email",
                AuthError::TokenExpired => "token_expired",
                AuthError::InvalidToken => "invalid_token",
                AuthError::RegistrationClosed => "registration_closed",
                AuthError::DomainNotAllowed(_) => "domain_not_allowed",
                AuthError::TokenEncode(_) => "internal",
            }),
            Self::Email(err) => Some(match err {
                EmailError::Connect(_) => "email_host_unreachable",
                EmailError::Auth(_) => "email_auth_failed",
                EmailError::Send(_) => "email_send_failed",
                EmailError::InvalidAddress(_) => "invalid_email",
                EmailError::MessageBuild(_) | EmailError::Template(_) => "internal",
            }),
            Self::Upstream(err) => Some(match err {
                VexaError::Unauthorized => "unauthorized",
                VexaError::NotFound(_) => "not_found",
                err if err.is_unavailable() => "upstream_unavailable",
                _ => "upstream_error",
            }),
            Self::Configuration(_) => Some("not_configured"),
            Self::Internal(_) => None,
        }
    }

    /// Client-safe message. Internal details never leak past the boundary.
    fn message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Upstream(err) if err.is_unavailable() => {
                "Upstream service unavailable, please retry".to_string()
            }
            Self::Upstream(VexaError::Unauthorized) => "Session is no longer valid".to_string(),
            Self::Upstream(_) => "Upstream service error".to_string(),
            Self::Email(EmailError::Connect(_)) => "Email server unreachable".to_string(),
            Self::Email(EmailError::Auth(_)) => "Email server rejected credentials".to_string(),
            Self::Email(EmailError::MessageBuild(_) | EmailError::Template(_)) => {
                "Failed to prepare email".to_string()
            }
            Self::Email(EmailError::Send(_)) => "Failed to send email".to_string(),
            Self::Auth(AuthError::TokenEncode(_)) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry; client errors are expected noise
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.message(),
            code: self.code(),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use vexa_core::EmailError as EmailParseError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_client_input_errors_are_400() {
        assert_eq!(
            get_status(AppError::BadRequest("missing email".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidEmail(
                EmailParseError::MissingAtSymbol
            ))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_token_errors_are_401() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidToken)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::TokenExpired)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_policy_rejections_are_403() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::RegistrationClosed)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::DomainNotAllowed(
                "example.com".to_string()
            ))),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_configuration_errors_are_503() {
        assert_eq!(
            get_status(AppError::Configuration("identity store".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_upstream_rejection_vs_unavailability() {
        assert_eq!(
            get_status(AppError::Upstream(VexaError::Unauthorized)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Upstream(VexaError::Api {
                status: 503,
                message: "down".to_string()
            })),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Upstream(VexaError::Api {
                status: 409,
                message: "conflict".to_string()
            })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = AppError::Internal("secret stack trace".to_string());
        assert_eq!(err.message(), "Internal server error");
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_email_failures_have_distinguishable_codes() {
        // The three SMTP failure kinds must be tellable apart by the UI
        let build_err = AppError::Email(EmailError::InvalidAddress("x".to_string()));
        assert_eq!(build_err.code(), Some("invalid_email"));

        let codes = [
            AppError::Auth(AuthError::RegistrationClosed).code(),
            AppError::Auth(AuthError::DomainNotAllowed("a.b".to_string())).code(),
        ];
        assert_eq!(codes[0], Some("registration_closed"));
        assert_eq!(codes[1], Some("domain_not_allowed"));
    }
}

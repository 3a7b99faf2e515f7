//! Authentication service errors.

use thiserror::Error;

use vexa_core::EmailError;

/// Errors from token issuance, verification, and registration policy.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The supplied email does not have a valid shape.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The magic-link token is past its embedded expiry.
    #[error("magic link has expired")]
    TokenExpired,

    /// Signature mismatch, malformed token, or wrong purpose.
    #[error("invalid magic link token")]
    InvalidToken,

    /// Signing a new token failed.
    #[error("failed to sign token: {0}")]
    TokenEncode(String),

    /// Registration policy: no new identities accepted.
    #[error("registration is invite-only")]
    RegistrationClosed,

    /// Registration policy: email domain not on the allow-list.
    #[error("email domain not allowed: {0}")]
    DomainNotAllowed(String),
}

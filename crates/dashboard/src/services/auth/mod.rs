//! Session issuance: magic-link tokens and registration policy.
//!
//! A magic link is a signed, stateless JWT binding an email to a time-boxed
//! login intent. Validity is entirely a function of the signature and the
//! embedded expiry - nothing is stored server-side, which means redeeming
//! the same valid token twice succeeds twice. That replay window is a
//! deliberate trade-off carried over from the original design; expiry is
//! the only revocation mechanism.

mod error;

pub use error::AuthError;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use vexa_core::Email;

use crate::config::RegistrationPolicy;

/// Magic-link token lifetime: 15 minutes.
pub const MAGIC_LINK_TTL_MINUTES: i64 = 15;

/// Purpose claim distinguishing magic-link tokens from any other signed
/// assertion under the same secret.
pub const MAGIC_LINK_PURPOSE: &str = "magic-link";

/// Session cookie lifetime: 30 days.
pub const SESSION_TTL_DAYS: i64 = 30;

/// Claims embedded in a magic-link token.
#[derive(Debug, Serialize, Deserialize)]
pub struct MagicLinkClaims {
    /// The email being asserted.
    pub sub: String,
    /// Always [`MAGIC_LINK_PURPOSE`] for tokens minted here.
    pub purpose: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Sign a magic-link token for an email.
///
/// # Errors
///
/// Returns [`AuthError::TokenEncode`] if signing fails.
pub fn issue_magic_link(email: &Email, secret: &SecretString) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = MagicLinkClaims {
        sub: email.as_str().to_owned(),
        purpose: MAGIC_LINK_PURPOSE.to_owned(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(MAGIC_LINK_TTL_MINUTES)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AuthError::TokenEncode(e.to_string()))
}

/// Verify a magic-link token, returning the embedded email.
///
/// Checks, in order: signature, expiry (no leeway), purpose, email shape.
/// Any failure yields an error and never a partial authentication.
///
/// # Errors
///
/// - [`AuthError::TokenExpired`] past the embedded expiry
/// - [`AuthError::InvalidToken`] on signature mismatch, malformed token, or
///   wrong purpose
/// - [`AuthError::InvalidEmail`] if the embedded subject is not an email
pub fn verify_magic_link(token: &str, secret: &SecretString) -> Result<Email, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<MagicLinkClaims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    if data.claims.purpose != MAGIC_LINK_PURPOSE {
        return Err(AuthError::InvalidToken);
    }

    Ok(Email::parse(&data.claims.sub)?)
}

/// Build the verification URL a magic-link email points at.
#[must_use]
pub fn verification_url(base_url: &str, token: &str) -> String {
    format!(
        "{}/auth/verify?token={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(token)
    )
}

/// Apply the registration policy to a login attempt.
///
/// Existing users always pass; creation of new identities is what the
/// policy gates. A rejection means no user and no credential get created.
///
/// # Errors
///
/// - [`AuthError::RegistrationClosed`] when registration is invite-only
/// - [`AuthError::DomainNotAllowed`] when the email's domain misses the
///   allow-list
pub fn check_registration(
    policy: &RegistrationPolicy,
    email: &Email,
    user_exists: bool,
) -> Result<(), AuthError> {
    if policy.allows(email, user_exists) {
        return Ok(());
    }
    if policy.invite_only {
        Err(AuthError::RegistrationClosed)
    } else {
        Err(AuthError::DomainNotAllowed(email.domain().to_owned()))
    }
}

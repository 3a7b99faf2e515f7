//! Authentication extractors.
//!
//! Provides extractors for requiring a session cookie or the admin API key
//! in route handlers. Sessions are stateless: the cookie value is the
//! platform API key itself, validated against the upstream on use rather
//! than against any local store.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use secrecy::ExposeSecret;

use crate::error::AppError;
use crate::models::cookies;
use crate::state::AppState;
use crate::vexa::ADMIN_KEY_HEADER;

/// Extractor that requires a session cookie.
///
/// Accepts the legacy underscore-named cookie as a fallback so sessions
/// issued before the rename keep working. Rejects with 401 when neither
/// cookie is present; the token itself is validated upstream by whichever
/// handler uses it.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     SessionToken(token): SessionToken,
/// ) -> impl IntoResponse {
///     // forward `token` to the platform API
/// }
/// ```
pub struct SessionToken(pub String);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Unauthorized("no session".to_string()))?;

        let token = jar
            .get(cookies::SESSION_COOKIE)
            .or_else(|| jar.get(cookies::LEGACY_SESSION_COOKIE))
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Unauthorized("no session".to_string()))?;

        Ok(Self(token))
    }
}

/// Extractor that gates the admin surface on the shared admin API key.
///
/// The request must carry the same `X-Admin-API-Key` header value the
/// dashboard uses for its own identity-store calls. When the admin API is
/// not configured the whole surface answers 503 rather than 401, so a
/// misconfigured deployment is distinguishable from a bad key.
pub struct RequireAdminKey;

impl FromRequestParts<AppState> for RequireAdminKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = state
            .config()
            .admin
            .as_ref()
            .ok_or_else(|| {
                AppError::Configuration("identity store is not configured".to_string())
            })?;

        let presented = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing admin key".to_string()))?;

        if presented != admin.api_key.expose_secret() {
            return Err(AppError::Forbidden("invalid admin key".to_string()));
        }

        Ok(Self)
    }
}

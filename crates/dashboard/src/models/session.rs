//! Session cookie model.
//!
//! The session is a client-held, server-set cookie carrying the opaque
//! bearer token. There is no server-side session store: the cookie is the
//! session, and the upstream API is the authority on whether the token is
//! still good.

use serde::{Deserialize, Serialize};

use vexa_core::{Email, UserId};

/// The authenticated user attached to a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Upstream identity id.
    pub id: UserId,
    /// Login email.
    pub email: Email,
    /// Display name, if known.
    #[serde(default)]
    pub name: Option<String>,
}

/// Best-effort profile hint set by an external SSO layer in the
/// `vexa-user-info` cookie. Read-only from this service's perspective.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInfoHint {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Identity provider that produced the hint.
    #[serde(default)]
    pub provider: Option<String>,
}

impl UserInfoHint {
    /// Parse the hint cookie value (URL-encoded JSON).
    ///
    /// Best-effort: any decode or parse failure yields `None`, never an
    /// error - a broken hint cookie must not break the session.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let decoded = urlencoding::decode(raw).ok()?;
        serde_json::from_str(&decoded).ok()
    }
}

/// Session cookie construction.
pub mod cookies {
    use axum_extra::extract::cookie::{Cookie, SameSite};
    use time::Duration;

    use crate::services::auth::SESSION_TTL_DAYS;

    /// Cookie holding the bearer token, forwarded upstream as `X-API-Key`.
    pub const SESSION_COOKIE: &str = "vexa-token";

    /// Older cookie name from a previous deployment; cleared on logout so
    /// stale copies cannot linger.
    pub const LEGACY_SESSION_COOKIE: &str = "vexa_token";

    /// Profile hint cookie set by the external SSO layer.
    pub const USER_INFO_COOKIE: &str = "vexa-user-info";

    /// Build the httpOnly session cookie holding a bearer token.
    #[must_use]
    pub fn session_cookie(
        token: &str,
        secure: bool,
        domain: Option<&str>,
    ) -> Cookie<'static> {
        let mut builder = Cookie::build((SESSION_COOKIE.to_owned(), token.to_owned()))
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .path("/".to_owned())
            .max_age(Duration::days(SESSION_TTL_DAYS));
        if let Some(domain) = domain {
            builder = builder.domain(domain.to_owned());
        }
        builder.build()
    }

    /// Build an expired cookie clearing the session.
    #[must_use]
    pub fn clear_session_cookie(secure: bool, domain: Option<&str>) -> Cookie<'static> {
        clear_cookie(SESSION_COOKIE, secure, domain)
    }

    /// Build an expired cookie clearing the legacy session name.
    #[must_use]
    pub fn clear_legacy_session_cookie(secure: bool, domain: Option<&str>) -> Cookie<'static> {
        clear_cookie(LEGACY_SESSION_COOKIE, secure, domain)
    }

    fn clear_cookie(name: &str, secure: bool, domain: Option<&str>) -> Cookie<'static> {
        let mut builder = Cookie::build((name.to_owned(), String::new()))
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .path("/".to_owned())
            .max_age(Duration::ZERO);
        if let Some(domain) = domain {
            builder = builder.domain(domain.to_owned());
        }
        builder.build()
    }
}

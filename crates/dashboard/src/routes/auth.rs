//! Authentication route handlers.
//!
//! Handles login (direct or magic-link, depending on whether SMTP is
//! configured), magic-link redemption, session checks, and logout. The
//! session cookie carries the platform API key itself; no session state is
//! held in this process.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{CurrentUser, UserInfoHint, cookies};
use crate::services::auth::{
    AuthError, check_registration, issue_magic_link, verification_url, verify_magic_link,
};
use crate::state::AppState;
use crate::vexa::types::{ApiToken, VexaUser};

// =============================================================================
// Request / Response Types
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Magic-link redemption query.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: String,
}

/// Direct-login response: the authenticated profile plus the raw API key,
/// for clients that talk to the platform API without the cookie.
#[derive(Debug, Serialize)]
pub struct DirectLoginResponse {
    pub user: CurrentUser,
    pub token: String,
}

/// Session-check response.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /auth/login` - start a login.
///
/// With SMTP configured this emails a magic link and acknowledges
/// generically, never echoing the token. Without SMTP it resolves (or
/// creates, policy permitting) the user upstream and issues the session
/// immediately.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    let email = vexa_core::Email::parse(&payload.email).map_err(AuthError::from)?;
    let admin = state.admin()?;

    if state.magic_link_enabled() {
        // Fail fast if the identity store is down before sending an email
        // that could not be redeemed.
        admin.ping().await?;

        let user_exists = admin.find_user_by_email(&email).await?.is_some();
        check_registration(&state.config().registration, &email, user_exists)?;

        let token = issue_magic_link(&email, &state.config().session_secret)?;
        let url = verification_url(&state.config().base_url, &token);

        // magic_link_enabled() implies the service is present
        let Some(mailer) = state.email() else {
            return Err(AppError::Configuration("email is not configured".to_string()));
        };
        mailer.send_magic_link(email.as_str(), &url).await?;

        tracing::info!(email = %email, "Magic link sent");
        return Ok(Json(json!({ "status": "sent" })).into_response());
    }

    // Direct login: no email round-trip, session issued from the address.
    let (user, api_token) = resolve_or_create(&state, &email).await?;

    let cookie = cookies::session_cookie(
        &api_token.token,
        state.config().cookie_secure(),
        state.config().cookie_domain.as_deref(),
    );

    tracing::info!(user_id = %user.id, "Direct login");

    let body = DirectLoginResponse {
        user: CurrentUser {
            id: user.id,
            email: user.email,
            name: user.name,
        },
        token: api_token.token,
    };
    Ok((jar.add(cookie), Json(body)).into_response())
}

/// `GET /auth/verify?token=...` - redeem a magic link.
///
/// A valid token can be redeemed more than once within its window; each
/// redemption mints a fresh upstream key. Expired or tampered tokens fail
/// atomically with no partial authentication.
pub async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<VerifyQuery>,
) -> Result<(CookieJar, Redirect)> {
    let email = verify_magic_link(&query.token, &state.config().session_secret)?;
    let (user, api_token) = resolve_or_create(&state, &email).await?;

    let cookie = cookies::session_cookie(
        &api_token.token,
        state.config().cookie_secure(),
        state.config().cookie_domain.as_deref(),
    );

    tracing::info!(user_id = %user.id, "Magic link redeemed");

    Ok((jar.add(cookie), Redirect::to("/")))
}

/// `GET /auth/session` - check whether the browser holds a live session.
///
/// No cookie means 401 without touching the upstream. With a cookie, the
/// key is validated against the transcription API; a rejected key clears
/// the cookie so the browser stops presenting it.
pub async fn session(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let Some(token) = session_token(&jar) else {
        return Err(AppError::Unauthorized("no session".to_string()));
    };

    if !state.api().validate_key(&token).await? {
        let secure = state.config().cookie_secure();
        let domain = state.config().cookie_domain.as_deref();
        let jar = jar
            .add(cookies::clear_session_cookie(secure, domain))
            .add(cookies::clear_legacy_session_cookie(secure, domain));
        let body = json!({ "error": "Session is no longer valid", "code": "unauthorized" });
        return Ok((StatusCode::UNAUTHORIZED, jar, Json(body)).into_response());
    }

    // Profile hints are cosmetic; a garbled cookie degrades to None.
    let hint = jar
        .get(cookies::USER_INFO_COOKIE)
        .and_then(|cookie| UserInfoHint::parse(cookie.value()))
        .unwrap_or_default();

    let body = SessionResponse {
        authenticated: true,
        name: hint.name,
        image: hint.image,
        provider: hint.provider,
    };
    Ok(Json(body).into_response())
}

/// `POST /auth/logout` - clear the session.
///
/// Clears both the current and the legacy cookie name and always succeeds,
/// cookie or not.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let secure = state.config().cookie_secure();
    let domain = state.config().cookie_domain.as_deref();
    let jar = jar
        .add(cookies::clear_session_cookie(secure, domain))
        .add(cookies::clear_legacy_session_cookie(secure, domain));

    (jar, Json(json!({ "status": "logged_out" })))
}

// =============================================================================
// Helpers
// =============================================================================

/// Pull the session token from either cookie name.
fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(cookies::SESSION_COOKIE)
        .or_else(|| jar.get(cookies::LEGACY_SESSION_COOKIE))
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolve the user upstream, creating them when the registration policy
/// allows, then mint a fresh bearer token.
///
/// Policy rejections happen before any upstream write, so a rejected login
/// never leaves a half-created identity behind.
async fn resolve_or_create(
    state: &AppState,
    email: &vexa_core::Email,
) -> Result<(VexaUser, ApiToken)> {
    let admin = state.admin()?;

    let user = match admin.find_user_by_email(email).await? {
        Some(user) => user,
        None => {
            check_registration(&state.config().registration, email, false)?;
            tracing::info!(email = %email, "Creating new user");
            admin.create_user(email, None).await?
        }
    };

    let token = admin.create_token(user.id).await?;
    Ok((user, token))
}

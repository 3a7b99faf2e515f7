//! Admin passthrough to the identity store.
//!
//! Thin, key-gated surface for operators: the caller must present the same
//! `X-Admin-API-Key` the dashboard itself uses upstream. The key is
//! compared here and re-attached by the client; it never round-trips
//! through the browser.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use vexa_core::UserId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminKey;
use crate::services::auth::AuthError;
use crate::state::AppState;
use crate::vexa::{VexaError, types::VexaUser};

/// Admin user-creation request.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /api/admin/users/{ident}` - look up a user by email or numeric id.
pub async fn get_user(
    _gate: RequireAdminKey,
    State(state): State<AppState>,
    Path(ident): Path<String>,
) -> Result<Json<VexaUser>> {
    let user = if let Ok(id) = ident.parse::<i64>() {
        state.admin()?.get_user(UserId::new(id)).await?
    } else {
        let email = vexa_core::Email::parse(&ident).map_err(AuthError::from)?;
        state
            .admin()?
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Upstream(VexaError::NotFound(email.to_string())))?
    };

    Ok(Json(user))
}

/// `POST /api/admin/users` - create a user, bypassing the registration
/// policy. Operators decide; the policy only binds self-service signup.
pub async fn create_user(
    _gate: RequireAdminKey,
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<VexaUser>)> {
    let email = vexa_core::Email::parse(&payload.email).map_err(AuthError::from)?;
    let user = state
        .admin()?
        .create_user(&email, payload.name.as_deref())
        .await?;

    tracing::info!(user_id = %user.id, "Admin created user");

    Ok((StatusCode::CREATED, Json(user)))
}

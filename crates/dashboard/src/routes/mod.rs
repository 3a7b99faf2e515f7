//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (identity-store probe)
//!
//! # Auth
//! POST /auth/login             - Start a login (magic link or direct)
//! GET  /auth/verify            - Redeem a magic link
//! GET  /auth/session           - Check the session cookie
//! POST /auth/logout            - Clear the session cookies
//!
//! # Browser API
//! GET  /api/config             - Runtime settings (wsUrl, apiUrl)
//! GET  /api/meetings           - Meetings, classified for display
//! ANY  /api/proxy/{*path}      - Reverse proxy to the transcription API
//!
//! # Admin (X-Admin-API-Key gated)
//! GET  /api/admin/users/{ident} - Look up a user by email or id
//! POST /api/admin/users         - Create a user
//! ```

pub mod admin;
pub mod auth;
pub mod meetings;
pub mod proxy;
pub mod system;

use axum::{
    Router,
    routing::{any, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/verify", get(auth::verify))
        .route("/session", get(auth::session))
        .route("/logout", post(auth::logout))
}

/// Create the browser API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/config", get(system::config))
        .route("/meetings", get(meetings::list))
        .route("/proxy/{*path}", any(proxy::forward))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(admin::create_user))
        .route("/users/{ident}", get(admin::get_user))
}

/// Create all routes for the dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health))
        .route("/health/ready", get(system::ready))
        .nest("/auth", auth_routes())
        .nest("/api", api_routes())
        .nest("/api/admin", admin_routes())
}

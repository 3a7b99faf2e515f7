//! Vexa Dashboard library.
//!
//! This crate provides the dashboard backend-for-frontend as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod vexa;

use axum::Router;
use state::AppState;

/// Build the application router with all routes and state attached.
///
/// Observability layers (Sentry, request tracing) are added by the binary;
/// tests drive this router directly.
#[must_use]
pub fn app(state: AppState) -> Router {
    routes::routes().with_state(state)
}

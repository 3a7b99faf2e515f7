//! Health and runtime-configuration endpoints.

use axum::{Json, extract::State};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::services::runtime::RuntimeSettings;
use crate::state::AppState;

/// `GET /health` - liveness. Answers as long as the process answers.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /health/ready` - readiness. Probes the identity store with a
/// bounded timeout; deployments without one are ready by definition.
pub async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    if let Ok(admin) = state.admin() {
        admin.ping().await?;
    }
    Ok(Json(json!({ "status": "ready" })))
}

/// `GET /api/config` - runtime settings for the browser.
///
/// Served from a process-wide cache that is computed once on first success
/// and retried on failure; a restart is the only refresh.
pub async fn config(State(state): State<AppState>) -> Result<Json<&'static RuntimeSettings>> {
    let settings = RuntimeSettings::get(&state.config().vexa)
        .await
        .map_err(|err| AppError::Configuration(err.to_string()))?;

    Ok(Json(settings))
}

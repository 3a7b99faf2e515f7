//! Generic reverse proxy to the transcription API.
//!
//! Forwards any method on `/api/proxy/{*path}` upstream with the session
//! token injected as `X-API-Key`. Upstream status codes and JSON bodies are
//! relayed verbatim - an upstream 404 is the caller's 404, not a gateway
//! error. Only transport failures (connect, timeout) are translated.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};

use crate::error::{AppError, Result};
use crate::middleware::SessionToken;
use crate::state::AppState;

/// `ANY /api/proxy/{*path}` - forward a request upstream.
pub async fn forward(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path(path): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let method = reqwest::Method::from_bytes(method.as_str().as_bytes())
        .map_err(|_| AppError::BadRequest("unsupported method".to_string()))?;

    // Re-attach the query string, which Path strips.
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let upstream = state
        .api()
        .forward(method, &path_and_query, body.to_vec(), content_type, &token)
        .await?;

    let status = StatusCode::from_u16(upstream.status)
        .map_err(|_| AppError::Internal("invalid upstream status".to_string()))?;

    Ok(match upstream.body {
        Some(json) => (status, Json(json)).into_response(),
        None => status.into_response(),
    })
}

//! Router tests against a throwaway upstream stub.
//!
//! A local listener stands in for the transcription API so branches that
//! depend on an upstream response - session invalidation, the proxy's
//! verbatim relay - get coverage without a running deployment.

#![allow(clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use vexa_dashboard::config::{DashboardConfig, RegistrationPolicy, VexaApiConfig};
use vexa_dashboard::state::AppState;

/// Serve a stub upstream on an ephemeral port, returning its base URL.
async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn app_against(api_url: String) -> Router {
    let config = DashboardConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("GPgMq0lso9ANMR3dMhyTlKCTjrHKLHUC"),
        cookie_domain: None,
        vexa: VexaApiConfig {
            api_url,
            ws_url: None,
        },
        admin: None,
        registration: RegistrationPolicy::default(),
        email: None,
        sentry_dsn: None,
        sentry_environment: None,
    };
    vexa_dashboard::app(AppState::new(config).unwrap())
}

async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_session_with_rejected_token_clears_cookies() {
    // Upstream treats the token as revoked.
    let upstream = Router::new().route("/meetings", get(|| async { StatusCode::UNAUTHORIZED }));
    let app = app_against(spawn_upstream(upstream).await);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/session")
                .header(header::COOKIE, "vexa-token=revoked")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Both cookie names must come back expired so the browser stops
    // presenting the stale token.
    let cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect();
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with("vexa-token=") && c.contains("Max-Age=0")),
        "session cookie not cleared: {cookies:?}"
    );
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with("vexa_token=") && c.contains("Max-Age=0")),
        "legacy cookie not cleared: {cookies:?}"
    );

    let body = body_json(response.into_body()).await;
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn test_session_with_accepted_token_merges_profile_hint() {
    let upstream = Router::new().route(
        "/meetings",
        get(|| async { Json(json!({ "meetings": [] })) }),
    );
    let app = app_against(spawn_upstream(upstream).await);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/session")
                .header(
                    header::COOKIE,
                    "vexa-token=good; vexa-user-info=%7B%22name%22%3A%22Ada%22%7D",
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["name"], "Ada");
}

#[tokio::test]
async fn test_proxy_relays_status_and_body_verbatim() {
    let upstream = Router::new().route(
        "/bots/7",
        get(|| async { (StatusCode::CONFLICT, Json(json!({ "detail": "busy" }))) }),
    );
    let app = app_against(spawn_upstream(upstream).await);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/proxy/bots/7")
                .header(header::COOKIE, "vexa-token=good")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // The upstream's 409 is the caller's 409, not a gateway error.
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["detail"], "busy");
}

#[tokio::test]
async fn test_proxy_relays_204_with_empty_body() {
    let upstream = Router::new().route("/bots/7", post(|| async { StatusCode::NO_CONTENT }));
    let app = app_against(spawn_upstream(upstream).await);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/proxy/bots/7")
                .header(header::COOKIE, "vexa-token=good")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_proxy_passes_headers_and_content_type_through() {
    async fn echo(headers: HeaderMap, body: Bytes) -> Json<Value> {
        Json(json!({
            "content_type": headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            "api_key": headers.get("X-API-Key").and_then(|v| v.to_str().ok()),
            "len": body.len(),
        }))
    }

    let upstream = Router::new().route("/echo", post(echo));
    let app = app_against(spawn_upstream(upstream).await);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/proxy/echo")
                .header(header::COOKIE, "vexa-token=good")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("hello"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["content_type"], "text/plain");
    assert_eq!(body["api_key"], "good");
    assert_eq!(body["len"], 5);
}

//! Router-level tests driven without a network.
//!
//! These exercise the request plumbing (routing, extractors, error bodies,
//! cookie handling) for every path that does not require a live upstream.
//! Flows that call the identity store or transcription API are covered by
//! the ignored end-to-end tests in `live.rs`.

#![allow(clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use vexa_dashboard::config::{DashboardConfig, RegistrationPolicy, VexaApiConfig, VexaAdminConfig};
use vexa_dashboard::state::AppState;

fn test_config() -> DashboardConfig {
    DashboardConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("GPgMq0lso9ANMR3dMhyTlKCTjrHKLHUC"),
        cookie_domain: None,
        vexa: VexaApiConfig {
            api_url: "http://localhost:18056".to_string(),
            ws_url: None,
        },
        admin: None,
        registration: RegistrationPolicy::default(),
        email: None,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn test_app() -> Router {
    let state = AppState::new(test_config()).unwrap();
    vexa_dashboard::app(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_is_ok() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_ready_without_identity_store_is_ready() {
    // No identity store configured means nothing to probe.
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_config_endpoint_derives_ws_url() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/config")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["apiUrl"], "http://localhost:18056");
    assert_eq!(body["wsUrl"], "ws://localhost:18056/ws");
}

#[tokio::test]
async fn test_session_without_cookie_is_401() {
    // Must reject locally, before any upstream call.
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/auth/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn test_login_with_malformed_email_is_400() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email":"not-an-email"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_email");
}

#[tokio::test]
async fn test_login_without_identity_store_is_503() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email":"user@example.com"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "not_configured");
}

#[tokio::test]
async fn test_verify_with_garbage_token_is_401() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/auth/verify?token=garbage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_token");
}

#[tokio::test]
async fn test_logout_clears_both_cookie_names() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header(header::COOKIE, "vexa-token=abc; vexa_token=old")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookies: Vec<&str> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap())
        .collect();

    assert!(cookies.iter().any(|c| c.starts_with("vexa-token=")));
    assert!(cookies.iter().any(|c| c.starts_with("vexa_token=")));
    for cookie in &cookies {
        assert!(cookie.contains("Max-Age=0"), "not expired: {cookie}");
    }
}

#[tokio::test]
async fn test_logout_without_cookie_still_succeeds() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "logged_out");
}

#[tokio::test]
async fn test_meetings_without_session_is_401() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/meetings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_proxy_without_session_is_401() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/proxy/bots")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_surface_without_identity_store_is_503() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/admin/users/user@example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

fn admin_app() -> Router {
    let mut config = test_config();
    config.admin = Some(VexaAdminConfig {
        url: "http://localhost:18057".to_string(),
        api_key: SecretString::from("test-admin-key"),
    });
    let state = AppState::new(config).unwrap();
    vexa_dashboard::app(state)
}

#[tokio::test]
async fn test_admin_surface_without_key_is_401() {
    let response = admin_app()
        .oneshot(
            Request::builder()
                .uri("/api/admin/users/user@example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_surface_with_wrong_key_is_403() {
    let response = admin_app()
        .oneshot(
            Request::builder()
                .uri("/api/admin/users/user@example.com")
                .header("X-Admin-API-Key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "forbidden");
}

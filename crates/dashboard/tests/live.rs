//! End-to-end tests against a running deployment.
//!
//! These tests require:
//! - The dashboard running (cargo run -p vexa-dashboard)
//! - A reachable identity store (VEXA_ADMIN_API_URL + VEXA_ADMIN_API_KEY)
//! - Direct-login mode (no SMTP configured)
//!
//! Run with: cargo test -p vexa-dashboard --test live -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL for the dashboard (configurable via environment).
fn dashboard_base_url() -> String {
    std::env::var("DASHBOARD_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
#[ignore = "Requires running dashboard and identity store"]
async fn test_direct_login_issues_usable_session() {
    let client = client();
    let base_url = dashboard_base_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": "e2e-login@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "e2e-login@example.com");

    // The cookie set by login must satisfy the session check.
    let resp = client
        .get(format!("{base_url}/auth/session"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["authenticated"], true);
}

#[tokio::test]
#[ignore = "Requires running dashboard and identity store"]
async fn test_proxy_relays_upstream_status() {
    let client = client();
    let base_url = dashboard_base_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": "e2e-proxy@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // An upstream 404 must come back as the caller's 404, not a 502.
    let resp = client
        .get(format!("{base_url}/api/proxy/bots/no_such_platform/xyz"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running dashboard and identity store"]
async fn test_meetings_listing_is_classified() {
    let client = client();
    let base_url = dashboard_base_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": "e2e-meetings@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/api/meetings"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let meetings: Vec<Value> = resp.json().await.unwrap();
    for meeting in &meetings {
        assert!(meeting["label"].is_string());
        assert!(meeting["text_class"].as_str().unwrap().starts_with("text-"));
        assert!(meeting["badge_class"].as_str().unwrap().starts_with("bg-"));
    }
}

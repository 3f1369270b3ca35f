//! Sign-in and token integration tests.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use chrono::{Duration, Utc};
use common::{TestHarness, TEST_JWT_SECRET};
use merch_service::TokenService;
use serde_json::{json, Value};

// ============================================================================
// Sign-in
// ============================================================================

#[tokio::test]
async fn first_sign_in_registers_with_thousand_coins() {
    let harness = TestHarness::new();

    let token = harness.sign_in("alice", "pw").await;
    let info = harness.info(&token).await;

    assert_eq!(info["coins"], 1000);
    assert!(info["inventory"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn second_sign_in_returns_a_working_token() {
    let harness = TestHarness::new();
    harness.sign_in("alice", "pw").await;

    let token = harness.sign_in("alice", "pw").await;

    assert_eq!(harness.info(&token).await["coins"], 1000);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let harness = TestHarness::new();
    harness.sign_in("alice", "pw").await;

    let response = harness
        .server
        .post("/api/auth")
        .json(&json!({ "username": "alice", "password": "nope" }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "invalid_credentials");
}

#[tokio::test]
async fn empty_username_is_bad_request() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/auth")
        .json(&json!({ "username": "", "password": "pw" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn missing_fields_are_bad_request() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/auth")
        .json(&json!({ "username": "alice" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Bearer tokens
// ============================================================================

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/info").await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn token_without_bearer_prefix_is_unauthorized() {
    let harness = TestHarness::new();
    let token = harness.sign_in("alice", "pw").await;

    let response = harness
        .server
        .get("/api/info")
        .add_header(AUTHORIZATION, HeaderValue::from_str(&token).unwrap())
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/api/buy/cup")
        .add_header(AUTHORIZATION, TestHarness::bearer("not-a-jwt"))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let harness = TestHarness::new();
    harness.sign_in("alice", "pw").await;

    let tokens = TokenService::new(TEST_JWT_SECRET.as_bytes(), Duration::hours(72));
    let stale = tokens
        .issue_at("alice", Utc::now() - Duration::hours(72))
        .unwrap();

    let response = harness
        .server
        .get("/api/info")
        .add_header(AUTHORIZATION, TestHarness::bearer(&stale))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn valid_token_for_unknown_account_is_unauthorized() {
    let harness = TestHarness::new();

    let tokens = TokenService::new(TEST_JWT_SECRET.as_bytes(), Duration::hours(72));
    let token = tokens.issue("ghost").unwrap();

    let response = harness
        .server
        .get("/api/info")
        .add_header(AUTHORIZATION, TestHarness::bearer(&token))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "unauthorized");
}

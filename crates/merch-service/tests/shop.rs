//! Purchase and transfer integration tests.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use common::TestHarness;
use serde_json::{json, Value};

// ============================================================================
// Purchases
// ============================================================================

#[tokio::test]
async fn buy_item_debits_balance() {
    let harness = TestHarness::new();
    let token = harness.sign_in("alice", "pw").await;

    let response = harness
        .server
        .get("/api/buy/tshirt")
        .add_header(AUTHORIZATION, TestHarness::bearer(&token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["item"], "tshirt");
    assert_eq!(body["price"], 500);
    assert_eq!(body["coins"], 500);

    let info = harness.info(&token).await;
    assert_eq!(info["coins"], 500);
    assert_eq!(info["inventory"][0]["type"], "tshirt");
    assert_eq!(info["inventory"][0]["quantity"], 1);
}

#[tokio::test]
async fn buy_above_balance_is_rejected_without_side_effects() {
    let harness = TestHarness::new();
    let token = harness.sign_in("alice", "pw").await;
    harness
        .server
        .get("/api/buy/tshirt")
        .add_header(AUTHORIZATION, TestHarness::bearer(&token))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/api/buy/jacket")
        .add_header(AUTHORIZATION, TestHarness::bearer(&token))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_funds");
    assert_eq!(body["error"]["details"]["balance"], 500);
    assert_eq!(body["error"]["details"]["required"], 600);

    assert_eq!(harness.info(&token).await["coins"], 500);
    assert_eq!(harness.store.purchase_count().await, 1);
}

#[tokio::test]
async fn buy_unknown_item_is_bad_request() {
    let harness = TestHarness::new();
    let token = harness.sign_in("alice", "pw").await;

    let response = harness
        .server
        .get("/api/buy/spaceship")
        .add_header(AUTHORIZATION, TestHarness::bearer(&token))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "item_not_found");
}

#[tokio::test]
async fn buy_without_auth_fails() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/buy/cup").await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Transfers
// ============================================================================

#[tokio::test]
async fn send_coin_moves_balance() {
    let harness = TestHarness::new();
    let alice = harness.sign_in("alice", "pw").await;
    let bob = harness.sign_in("bob", "pw").await;

    let response = harness
        .server
        .post("/api/sendCoin")
        .add_header(AUTHORIZATION, TestHarness::bearer(&alice))
        .json(&json!({ "toUser": "bob", "amount": 200 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["toUser"], "bob");
    assert_eq!(body["amount"], 200);
    assert_eq!(body["coins"], 800);

    assert_eq!(harness.info(&alice).await["coins"], 800);
    assert_eq!(harness.info(&bob).await["coins"], 1200);
}

#[tokio::test]
async fn send_coin_to_unknown_user_is_bad_request() {
    let harness = TestHarness::new();
    let alice = harness.sign_in("alice", "pw").await;

    let response = harness
        .server
        .post("/api/sendCoin")
        .add_header(AUTHORIZATION, TestHarness::bearer(&alice))
        .json(&json!({ "toUser": "ghost", "amount": 10 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "receiver_not_found");
    assert_eq!(harness.info(&alice).await["coins"], 1000);
}

#[tokio::test]
async fn send_coin_to_self_is_bad_request() {
    let harness = TestHarness::new();
    let alice = harness.sign_in("alice", "pw").await;

    let response = harness
        .server
        .post("/api/sendCoin")
        .add_header(AUTHORIZATION, TestHarness::bearer(&alice))
        .json(&json!({ "toUser": "alice", "amount": 10 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(harness.store.transfer_count().await, 0);
}

#[tokio::test]
async fn send_non_positive_amount_is_bad_request() {
    let harness = TestHarness::new();
    let alice = harness.sign_in("alice", "pw").await;
    harness.sign_in("bob", "pw").await;

    for amount in [0, -50] {
        let response = harness
            .server
            .post("/api/sendCoin")
            .add_header(AUTHORIZATION, TestHarness::bearer(&alice))
            .json(&json!({ "toUser": "bob", "amount": amount }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
    assert_eq!(harness.info(&alice).await["coins"], 1000);
}

#[tokio::test]
async fn send_more_than_balance_is_rejected() {
    let harness = TestHarness::new();
    let alice = harness.sign_in("alice", "pw").await;
    let bob = harness.sign_in("bob", "pw").await;

    let response = harness
        .server
        .post("/api/sendCoin")
        .add_header(AUTHORIZATION, TestHarness::bearer(&alice))
        .json(&json!({ "toUser": "bob", "amount": 5000 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_funds");
    assert_eq!(harness.info(&alice).await["coins"], 1000);
    assert_eq!(harness.info(&bob).await["coins"], 1000);
}

#[tokio::test]
async fn malformed_transfer_body_is_bad_request() {
    let harness = TestHarness::new();
    let alice = harness.sign_in("alice", "pw").await;

    let response = harness
        .server
        .post("/api/sendCoin")
        .add_header(AUTHORIZATION, TestHarness::bearer(&alice))
        .json(&json!({ "toUser": "bob", "amount": "lots" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

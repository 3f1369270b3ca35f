//! Common test utilities for merch-service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};

use merch_core::{default_catalog, CatalogItem};
use merch_service::{create_router, AppState, Argon2Hasher, ServiceConfig};
use merch_store::MemoryStore;

/// Secret the harness signs tokens with.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The backing store, for assertions that bypass HTTP.
    pub store: Arc<MemoryStore>,
}

impl TestHarness {
    /// Create a new test harness with a fresh store and the default catalog.
    pub fn new() -> Self {
        let mut items = default_catalog();
        // Priced for the overdraft scenarios.
        items.push(CatalogItem::new("tshirt", 500));
        items.push(CatalogItem::new("jacket", 600));
        Self::with_catalog(items)
    }

    /// Create a new test harness selling `items`.
    pub fn with_catalog(items: Vec<CatalogItem>) -> Self {
        let store = Arc::new(MemoryStore::with_catalog(items));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            database_url: None,
            database_max_connections: 1,
            jwt_secret: TEST_JWT_SECRET.into(),
            token_ttl_hours: 72,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let hasher = Arc::new(Argon2Hasher::with_cost(1024, 1).expect("valid argon2 params"));
        let state = AppState::with_hasher(store.clone(), config, hasher);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, store }
    }

    /// Sign in (registering if needed) and return the token.
    pub async fn sign_in(&self, username: &str, password: &str) -> String {
        let response = self
            .server
            .post("/api/auth")
            .json(&json!({ "username": username, "password": password }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        body["token"]
            .as_str()
            .expect("token in auth response")
            .to_string()
    }

    /// Bearer header value for `token`.
    pub fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header value")
    }

    /// Fetch `/api/info` for `token`.
    pub async fn info(&self, token: &str) -> Value {
        let response = self
            .server
            .get("/api/info")
            .add_header(axum::http::header::AUTHORIZATION, Self::bearer(token))
            .await;

        response.assert_status_ok();
        response.json()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

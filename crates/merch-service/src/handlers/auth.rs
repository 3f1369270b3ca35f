//! Sign-in handler.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Sign-in request.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    /// Login name. Unknown names are registered.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Sign-in response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Bearer token for the other endpoints.
    pub token: String,
}

/// Sign in, creating the account on first use.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = payload?;

    let session = state
        .ledger
        .authenticate_or_register(&request.username, &request.password)
        .await?;

    tracing::debug!(user = %session.identity.username, "Token issued");

    Ok(Json(AuthResponse {
        token: session.token,
    }))
}

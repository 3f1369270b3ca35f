//! Authorization gate and the `AuthUser` extractor.
//!
//! Every protected route resolves its caller through [`AuthGate::authorize`]
//! before touching the ledger: the bearer token must verify, and the account
//! it names must still exist.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use merch_core::{Identity, LedgerError, Result};
use merch_store::Store;

use crate::error::ApiError;
use crate::state::AppState;
use crate::token::TokenService;

/// Turns a raw bearer token into an [`Identity`].
#[derive(Clone)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
    store: Arc<dyn Store>,
}

impl AuthGate {
    /// Create a gate over a token service and account store.
    #[must_use]
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn Store>) -> Self {
        Self { tokens, store }
    }

    /// Resolve the caller behind `raw_token`.
    ///
    /// # Errors
    ///
    /// - `LedgerError::Unauthorized` if the token does not verify.
    /// - `LedgerError::AccountNotFound` if it verifies but names no account.
    pub async fn authorize(&self, raw_token: &str) -> Result<Identity> {
        let username = self
            .tokens
            .verify(raw_token)
            .map_err(|_| LedgerError::Unauthorized)?;

        let account = self
            .store
            .get_account_by_username(&username)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user = %username, "Token subject has no account");
                LedgerError::AccountNotFound {
                    username: username.clone(),
                }
            })?;

        Ok(account.identity())
    }
}

/// An authenticated caller, extracted from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The resolved identity.
    pub identity: Identity,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let identity = state.gate.authorize(token).await?;

        Ok(AuthUser { identity })
    }
}

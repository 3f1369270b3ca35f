//! Application state.

use std::sync::Arc;

use chrono::Duration;
use merch_store::Store;

use crate::auth::AuthGate;
use crate::config::ServiceConfig;
use crate::ledger::Ledger;
use crate::password::{Argon2Hasher, PasswordHasher};
use crate::token::TokenService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The coin ledger.
    pub ledger: Ledger,

    /// Resolves bearer tokens to identities.
    pub gate: AuthGate,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state with the default password hasher.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        Self::with_hasher(store, config, Arc::new(Argon2Hasher::default()))
    }

    /// Create a new application state with a specific password hasher.
    #[must_use]
    pub fn with_hasher(
        store: Arc<dyn Store>,
        config: ServiceConfig,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(
            config.jwt_secret.as_bytes(),
            Duration::hours(config.token_ttl_hours),
        ));

        tracing::debug!(ttl_hours = config.token_ttl_hours, "Token service ready");

        Self {
            ledger: Ledger::new(Arc::clone(&store), Arc::clone(&tokens), hasher),
            gate: AuthGate::new(tokens, store),
            config,
        }
    }
}

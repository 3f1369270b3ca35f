//! Signed, time-limited identity tokens.
//!
//! Tokens are HS256 JWTs carrying the username in `sub` and an absolute
//! expiry in `exp`. The signing secret is fixed for the life of the process;
//! changing it invalidates every outstanding token.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use merch_core::{LedgerError, Result};

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 72;

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username).
    pub sub: String,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiration time (unix seconds).
    pub exp: i64,
}

/// Issues and verifies identity tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service signing with `secret`.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Token lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `identity`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Internal` if signing fails.
    pub fn issue(&self, identity: &str) -> Result<String> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token for `identity` as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Internal` if signing fails.
    pub fn issue_at(&self, identity: &str, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: identity.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| LedgerError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify a token and return the identity it carries.
    ///
    /// Does not check that the account still exists.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidToken` if the token is malformed, signed
    /// with another key or algorithm, lacks `sub`/`exp`, or has expired.
    pub fn verify(&self, token: &str) -> Result<String> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// A token is rejected from the second its `exp` is reached.
    ///
    /// # Errors
    ///
    /// See [`TokenService::verify`].
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against `now`, without leeway.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Token validation failed");
            LedgerError::InvalidToken
        })?;

        if now.timestamp() >= data.claims.exp {
            tracing::debug!(sub = %data.claims.sub, "Token expired");
            return Err(LedgerError::InvalidToken);
        }

        Ok(data.claims.sub)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

//! Account types.
//!
//! An account is a username, a password hash and a coin balance. Accounts are
//! provisioned on first authentication and never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AccountId;

/// Coins granted to every newly provisioned account.
pub const STARTING_BALANCE: i64 = 1000;

/// A coin account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable account identifier.
    pub id: AccountId,

    /// Unique login name.
    pub username: String,

    /// Salted password hash (PHC string format).
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Current coin balance. Never negative after a committed mutation.
    pub balance: i64,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the balance last changed.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account holding [`STARTING_BALANCE`] coins.
    #[must_use]
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::generate(),
            username: username.into(),
            password_hash: password_hash.into(),
            balance: STARTING_BALANCE,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the account can pay `amount` coins.
    #[must_use]
    pub fn has_sufficient_coins(&self, amount: i64) -> bool {
        self.balance >= amount
    }

    /// The identity this account authenticates as.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            account_id: self.id,
            username: self.username.clone(),
        }
    }
}

/// An authenticated caller.
///
/// Produced by the authorization gate and passed explicitly into every ledger
/// call that acts on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// The caller's account.
    pub account_id: AccountId,
    /// The caller's username (the token subject).
    pub username: String,
}

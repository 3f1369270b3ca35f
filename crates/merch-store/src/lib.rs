//! Storage layer for the merch shop coin ledger.
//!
//! This crate provides the [`Store`] trait and two implementations:
//!
//! - [`PgStore`]: PostgreSQL via `sqlx`, with row-locking transactions
//! - [`MemoryStore`]: a mutex-guarded in-memory store for tests and local runs
//!
//! # Atomicity
//!
//! [`Store::purchase`] and [`Store::transfer`] re-read balances (and, for a
//! purchase, the item price) under a lock and apply the debit, credit and
//! record insert as one unit. Two concurrent
//! debits against the same account can never both observe the pre-debit
//! balance.
//!
//! # Example
//!
//! ```no_run
//! use merch_core::{Account, CatalogItem, PurchaseRecord};
//! use merch_store::{MemoryStore, Store};
//!
//! # async fn example() -> merch_store::Result<()> {
//! let store = MemoryStore::with_catalog(vec![CatalogItem::new("cup", 20)]);
//!
//! let account = Account::new("alice", "hash");
//! store.create_account(&account).await?;
//!
//! let item = store.get_item("cup").await?.expect("seeded");
//! let outcome = store.purchase(&PurchaseRecord::new(account.id, &item)).await?;
//! assert_eq!(outcome.balance, 980);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use merch_core::{
    Account, AccountId, CatalogItem, CoinHistory, InventoryEntry, PurchaseRecord, TransferRecord,
};

/// A committed purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseOutcome {
    /// Price actually charged, read in the same transaction as the debit.
    pub price: i64,

    /// Buyer balance after the debit.
    pub balance: i64,
}

/// The storage trait defining all database operations.
///
/// The ledger depends only on this trait, so any backend (Postgres,
/// in-memory) can be substituted.
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // Accounts
    // =========================================================================

    /// Get an account by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>>;

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_account(&self, account_id: &AccountId) -> Result<Option<Account>>;

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the username is already taken.
    async fn create_account(&self, account: &Account) -> Result<()>;

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Get a catalog item by exact, case-sensitive name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_item(&self, name: &str) -> Result<Option<CatalogItem>>;

    /// Insert or reprice a catalog item.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn put_item(&self, item: &CatalogItem) -> Result<()>;

    // =========================================================================
    // Atomic mutations
    // =========================================================================

    /// Debit the buyer by the item's current price and insert the purchase
    /// record atomically.
    ///
    /// The price is re-read under the same lock as the balance; `record.price`
    /// is only the price the caller saw and is replaced by the charged one.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the buyer or the item doesn't exist.
    /// - `StoreError::InsufficientFunds` if the balance is below the price.
    async fn purchase(&self, record: &PurchaseRecord) -> Result<PurchaseOutcome>;

    /// Debit the sender, credit the receiver and insert the transfer record atomically.
    ///
    /// Returns the sender's balance after the debit.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if either account doesn't exist.
    /// - `StoreError::InsufficientFunds` if the sender's balance is below the amount.
    async fn transfer(&self, record: &TransferRecord) -> Result<i64>;

    // =========================================================================
    // Queries
    // =========================================================================

    /// Count purchases per item for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn inventory(&self, account_id: &AccountId) -> Result<Vec<InventoryEntry>>;

    /// All transfers in and out of an account, with counterpart usernames.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn coin_history(&self, account_id: &AccountId) -> Result<CoinHistory>;
}

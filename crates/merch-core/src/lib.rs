//! Core types for the merch shop coin ledger.
//!
//! This crate provides the foundational types shared by the store and the service:
//!
//! - **Identifiers**: `AccountId`, `RecordId`
//! - **Accounts**: `Account`, `Identity`
//! - **Catalog**: `CatalogItem`, `default_catalog`
//! - **Records**: `PurchaseRecord`, `TransferRecord`
//! - **History**: `InventoryEntry`, `CoinHistory`, `AccountInfo`
//! - **Errors**: `LedgerError`, `ErrorKind`
//!
//! # Coins
//!
//! Coins are whole units stored as `i64`. There are no fractional coins and
//! every account starts with [`STARTING_BALANCE`] coins.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod catalog;
pub mod error;
pub mod history;
pub mod ids;
pub mod records;

pub use account::{Account, Identity, STARTING_BALANCE};
pub use catalog::{default_catalog, CatalogItem};
pub use error::{ErrorKind, LedgerError, Result};
pub use history::{AccountInfo, CoinHistory, InventoryEntry, ReceivedCoins, SentCoins};
pub use ids::{AccountId, IdError, RecordId};
pub use records::{PurchaseRecord, TransferRecord};

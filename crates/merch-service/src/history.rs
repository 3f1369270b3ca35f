//! Inventory and coin history queries.

use std::sync::Arc;

use merch_core::{AccountId, CoinHistory, InventoryEntry, Result};
use merch_store::Store;

/// Read-side queries over purchase and transfer records.
#[derive(Clone)]
pub struct HistoryQuery {
    store: Arc<dyn Store>,
}

impl HistoryQuery {
    /// Create a query service backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Items owned by an account, one entry per item name.
    ///
    /// Entry order is not part of the contract.
    pub async fn inventory_of(&self, account_id: &AccountId) -> Result<Vec<InventoryEntry>> {
        Ok(self.store.inventory(account_id).await?)
    }

    /// Every transfer into and out of an account.
    pub async fn coin_history_of(&self, account_id: &AccountId) -> Result<CoinHistory> {
        Ok(self.store.coin_history(account_id).await?)
    }
}

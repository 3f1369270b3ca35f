//! In-memory storage implementation.
//!
//! Every operation takes one mutex guard and never awaits while holding it,
//! so each mutation is atomic and a cancelled caller leaves no partial write.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use merch_core::{
    Account, AccountId, CatalogItem, CoinHistory, InventoryEntry, PurchaseRecord, ReceivedCoins,
    SentCoins, TransferRecord,
};

use crate::error::{Result, StoreError};
use crate::{PurchaseOutcome, Store};

fn receiver_not_found(record: &TransferRecord) -> StoreError {
    StoreError::NotFound {
        entity: "account",
        id: record.receiver_id.to_string(),
    }
}

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    usernames: HashMap<String, AccountId>,
    items: HashMap<String, CatalogItem>,
    purchases: Vec<PurchaseRecord>,
    transfers: Vec<TransferRecord>,
}

impl Tables {
    fn username_of(&self, account_id: &AccountId) -> Option<&str> {
        self.accounts
            .get(account_id)
            .map(|account| account.username.as_str())
    }
}

/// Mutex-guarded in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with catalog items.
    #[must_use]
    pub fn with_catalog(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let tables = Tables {
            items: items
                .into_iter()
                .map(|item| (item.name.clone(), item))
                .collect(),
            ..Tables::default()
        };
        Self {
            tables: Mutex::new(tables),
        }
    }

    /// Number of purchase records committed so far.
    pub async fn purchase_count(&self) -> usize {
        self.tables.lock().await.purchases.len()
    }

    /// Number of transfer records committed so far.
    pub async fn transfer_count(&self) -> usize {
        self.tables.lock().await.transfers.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .usernames
            .get(username)
            .and_then(|id| tables.accounts.get(id))
            .cloned())
    }

    async fn get_account(&self, account_id: &AccountId) -> Result<Option<Account>> {
        Ok(self.tables.lock().await.accounts.get(account_id).cloned())
    }

    async fn create_account(&self, account: &Account) -> Result<()> {
        let mut guard = self.tables.lock().await;
        let tables = &mut *guard;

        if tables.usernames.contains_key(&account.username) {
            return Err(StoreError::Conflict {
                entity: "account",
                id: account.username.clone(),
            });
        }

        tables.usernames.insert(account.username.clone(), account.id);
        tables.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn get_item(&self, name: &str) -> Result<Option<CatalogItem>> {
        Ok(self.tables.lock().await.items.get(name).cloned())
    }

    async fn put_item(&self, item: &CatalogItem) -> Result<()> {
        self.tables
            .lock()
            .await
            .items
            .insert(item.name.clone(), item.clone());
        Ok(())
    }

    async fn purchase(&self, record: &PurchaseRecord) -> Result<PurchaseOutcome> {
        let mut guard = self.tables.lock().await;
        let tables = &mut *guard;

        let price = tables
            .items
            .get(&record.item)
            .map(|item| item.price)
            .ok_or_else(|| StoreError::NotFound {
                entity: "item",
                id: record.item.clone(),
            })?;

        let buyer = tables
            .accounts
            .get_mut(&record.account_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "account",
                id: record.account_id.to_string(),
            })?;

        if buyer.balance < price {
            return Err(StoreError::InsufficientFunds {
                balance: buyer.balance,
                required: price,
            });
        }

        buyer.balance -= price;
        buyer.updated_at = record.created_at;
        let balance = buyer.balance;

        tables.purchases.push(PurchaseRecord {
            price,
            ..record.clone()
        });
        Ok(PurchaseOutcome { price, balance })
    }

    async fn transfer(&self, record: &TransferRecord) -> Result<i64> {
        let mut guard = self.tables.lock().await;
        let tables = &mut *guard;

        if !tables.accounts.contains_key(&record.receiver_id) {
            return Err(receiver_not_found(record));
        }

        let sender = tables
            .accounts
            .get_mut(&record.sender_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "account",
                id: record.sender_id.to_string(),
            })?;

        if sender.balance < record.amount {
            return Err(StoreError::InsufficientFunds {
                balance: sender.balance,
                required: record.amount,
            });
        }

        sender.balance -= record.amount;
        sender.updated_at = record.created_at;
        let sender_balance = sender.balance;

        let receiver = tables
            .accounts
            .get_mut(&record.receiver_id)
            .ok_or_else(|| receiver_not_found(record))?;
        receiver.balance += record.amount;
        receiver.updated_at = record.created_at;

        tables.transfers.push(record.clone());
        Ok(sender_balance)
    }

    async fn inventory(&self, account_id: &AccountId) -> Result<Vec<InventoryEntry>> {
        let tables = self.tables.lock().await;

        let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
        for purchase in tables
            .purchases
            .iter()
            .filter(|p| p.account_id == *account_id)
        {
            *counts.entry(purchase.item.as_str()).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(item, quantity)| InventoryEntry {
                item: item.to_string(),
                quantity,
            })
            .collect())
    }

    async fn coin_history(&self, account_id: &AccountId) -> Result<CoinHistory> {
        let tables = self.tables.lock().await;
        let mut history = CoinHistory::default();

        for transfer in &tables.transfers {
            if transfer.receiver_id == *account_id {
                if let Some(from_user) = tables.username_of(&transfer.sender_id) {
                    history.received.push(ReceivedCoins {
                        from_user: from_user.to_string(),
                        amount: transfer.amount,
                    });
                }
            }
            if transfer.sender_id == *account_id {
                if let Some(to_user) = tables.username_of(&transfer.receiver_id) {
                    history.sent.push(SentCoins {
                        to_user: to_user.to_string(),
                        amount: transfer.amount,
                    });
                }
            }
        }

        Ok(history)
    }
}

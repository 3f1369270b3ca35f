//! Read-side views over purchases and transfers.

use serde::{Deserialize, Serialize};

/// How many units of one item an account owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// Item name.
    pub item: String,
    /// Number of purchase records for this item.
    pub quantity: i64,
}

/// Coins received from another account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedCoins {
    /// Sender's username.
    pub from_user: String,
    /// Coins received.
    pub amount: i64,
}

/// Coins sent to another account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentCoins {
    /// Receiver's username.
    pub to_user: String,
    /// Coins sent.
    pub amount: i64,
}

/// Full transfer history of one account, split by direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinHistory {
    /// Transfers where the account was the receiver.
    pub received: Vec<ReceivedCoins>,
    /// Transfers where the account was the sender.
    pub sent: Vec<SentCoins>,
}

/// Balance, inventory and transfer history of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Current balance.
    pub coins: i64,
    /// Items owned, grouped by name.
    pub inventory: Vec<InventoryEntry>,
    /// Transfers in and out.
    pub coin_history: CoinHistory,
}

impl AccountInfo {
    /// Quantity of `item` in the inventory, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, item: &str) -> i64 {
        self.inventory
            .iter()
            .find(|entry| entry.item == item)
            .map_or(0, |entry| entry.quantity)
    }
}

//! Purchase and transfer records.
//!
//! Records are immutable facts. The ledger builds them before the store
//! commits them together with the balance change they describe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, CatalogItem, RecordId};

/// One unit of a catalog item bought by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Record ID (ULID for time-ordering).
    pub id: RecordId,

    /// The buyer.
    pub account_id: AccountId,

    /// Name of the item bought.
    pub item: String,

    /// Coins debited for this unit.
    pub price: i64,

    /// When the purchase was made.
    pub created_at: DateTime<Utc>,
}

impl PurchaseRecord {
    /// Create a record for `account_id` buying one `item`.
    #[must_use]
    pub fn new(account_id: AccountId, item: &CatalogItem) -> Self {
        Self {
            id: RecordId::generate(),
            account_id,
            item: item.name.clone(),
            price: item.price,
            created_at: Utc::now(),
        }
    }
}

/// Coins moved from one account to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Record ID (ULID for time-ordering).
    pub id: RecordId,

    /// The account debited.
    pub sender_id: AccountId,

    /// The account credited.
    pub receiver_id: AccountId,

    /// Coins moved. Always positive.
    pub amount: i64,

    /// When the transfer was made.
    pub created_at: DateTime<Utc>,
}

impl TransferRecord {
    /// Create a transfer record.
    #[must_use]
    pub fn new(sender_id: AccountId, receiver_id: AccountId, amount: i64) -> Self {
        Self {
            id: RecordId::generate(),
            sender_id,
            receiver_id,
            amount,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_record_copies_item_price() {
        let buyer = AccountId::generate();
        let item = CatalogItem::new("cup", 20);
        let record = PurchaseRecord::new(buyer, &item);

        assert_eq!(record.account_id, buyer);
        assert_eq!(record.item, "cup");
        assert_eq!(record.price, 20);
    }

    #[test]
    fn transfer_records_get_distinct_ids() {
        let a = AccountId::generate();
        let b = AccountId::generate();
        let first = TransferRecord::new(a, b, 10);
        let second = TransferRecord::new(a, b, 10);
        assert_ne!(first.id, second.id);
    }
}

//! PostgreSQL storage implementation.
//!
//! Each mutation runs in its own transaction. Account rows are locked with
//! `SELECT ... FOR UPDATE` before the balance is checked, and a transfer locks
//! both rows in id order so two opposite transfers cannot deadlock. Dropping an
//! uncommitted transaction rolls it back.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};

use merch_core::{
    Account, AccountId, CatalogItem, CoinHistory, InventoryEntry, PurchaseRecord, ReceivedCoins,
    SentCoins, TransferRecord,
};

use crate::error::{Result, StoreError};
use crate::{PurchaseOutcome, Store};

/// How long to wait for a pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL-backed storage implementation.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: uuid::Uuid,
    username: String,
    password_hash: String,
    balance: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: AccountId::from_uuid(row.id),
            username: row.username,
            password_hash: row.password_hash,
            balance: row.balance,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_ACCOUNT: &str =
    "SELECT id, username, password_hash, balance, created_at, updated_at FROM accounts";

impl PgStore {
    /// Connect to the database at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be established.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::debug!("Migrations completed successfully");
        Ok(())
    }

    /// The underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn account_not_found(account_id: &AccountId) -> StoreError {
    StoreError::NotFound {
        entity: "account",
        id: account_id.to_string(),
    }
}

#[async_trait]
impl Store for PgStore {
    // =========================================================================
    // Accounts
    // =========================================================================

    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        let query = format!("{SELECT_ACCOUNT} WHERE username = $1");
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Account::from))
    }

    async fn get_account(&self, account_id: &AccountId) -> Result<Option<Account>> {
        let query = format!("{SELECT_ACCOUNT} WHERE id = $1");
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(*account_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Account::from))
    }

    async fn create_account(&self, account: &Account) -> Result<()> {
        let result = sqlx::query(
            r"
            INSERT INTO accounts (id, username, password_hash, balance, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(*account.id.as_uuid())
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.balance)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Conflict {
                entity: "account",
                id: account.username.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    async fn get_item(&self, name: &str) -> Result<Option<CatalogItem>> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT name, price FROM catalog_items WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(name, price)| CatalogItem { name, price }))
    }

    async fn put_item(&self, item: &CatalogItem) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO catalog_items (name, price) VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET price = EXCLUDED.price
            ",
        )
        .bind(&item.name)
        .bind(item.price)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Atomic mutations
    // =========================================================================

    async fn purchase(&self, record: &PurchaseRecord) -> Result<PurchaseOutcome> {
        let mut tx = self.pool.begin().await?;

        // FOR SHARE holds the price until commit
        let (price,): (i64,) =
            sqlx::query_as("SELECT price FROM catalog_items WHERE name = $1 FOR SHARE")
                .bind(&record.item)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| StoreError::NotFound {
                    entity: "item",
                    id: record.item.clone(),
                })?;

        let (balance,): (i64,) =
            sqlx::query_as("SELECT balance FROM accounts WHERE id = $1 FOR UPDATE")
                .bind(*record.account_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| account_not_found(&record.account_id))?;

        if balance < price {
            return Err(StoreError::InsufficientFunds {
                balance,
                required: price,
            });
        }

        sqlx::query("UPDATE accounts SET balance = balance - $2, updated_at = $3 WHERE id = $1")
            .bind(*record.account_id.as_uuid())
            .bind(price)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r"
            INSERT INTO purchases (id, account_id, item, price, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(record.id.to_string())
        .bind(*record.account_id.as_uuid())
        .bind(&record.item)
        .bind(price)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PurchaseOutcome {
            price,
            balance: balance - price,
        })
    }

    async fn transfer(&self, record: &TransferRecord) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let ids = vec![*record.sender_id.as_uuid(), *record.receiver_id.as_uuid()];
        let locked: Vec<(uuid::Uuid, i64)> = sqlx::query_as(
            "SELECT id, balance FROM accounts WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(ids)
        .fetch_all(&mut *tx)
        .await?;

        let balance_of = |account_id: &AccountId| {
            locked
                .iter()
                .find(|(id, _)| id == account_id.as_uuid())
                .map(|(_, balance)| *balance)
        };

        let sender_balance =
            balance_of(&record.sender_id).ok_or_else(|| account_not_found(&record.sender_id))?;
        if balance_of(&record.receiver_id).is_none() {
            return Err(account_not_found(&record.receiver_id));
        }

        if sender_balance < record.amount {
            return Err(StoreError::InsufficientFunds {
                balance: sender_balance,
                required: record.amount,
            });
        }

        sqlx::query("UPDATE accounts SET balance = balance - $2, updated_at = $3 WHERE id = $1")
            .bind(*record.sender_id.as_uuid())
            .bind(record.amount)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE accounts SET balance = balance + $2, updated_at = $3 WHERE id = $1")
            .bind(*record.receiver_id.as_uuid())
            .bind(record.amount)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r"
            INSERT INTO transfers (id, sender_id, receiver_id, amount, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(record.id.to_string())
        .bind(*record.sender_id.as_uuid())
        .bind(*record.receiver_id.as_uuid())
        .bind(record.amount)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(sender_balance - record.amount)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    async fn inventory(&self, account_id: &AccountId) -> Result<Vec<InventoryEntry>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r"
            SELECT item, COUNT(*) AS quantity
            FROM purchases
            WHERE account_id = $1
            GROUP BY item
            ORDER BY item
            ",
        )
        .bind(*account_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(item, quantity)| InventoryEntry { item, quantity })
            .collect())
    }

    async fn coin_history(&self, account_id: &AccountId) -> Result<CoinHistory> {
        let received: Vec<(String, i64)> = sqlx::query_as(
            r"
            SELECT a.username, t.amount
            FROM transfers t
            JOIN accounts a ON a.id = t.sender_id
            WHERE t.receiver_id = $1
            ORDER BY t.id
            ",
        )
        .bind(*account_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let sent: Vec<(String, i64)> = sqlx::query_as(
            r"
            SELECT a.username, t.amount
            FROM transfers t
            JOIN accounts a ON a.id = t.receiver_id
            WHERE t.sender_id = $1
            ORDER BY t.id
            ",
        )
        .bind(*account_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(CoinHistory {
            received: received
                .into_iter()
                .map(|(from_user, amount)| ReceivedCoins { from_user, amount })
                .collect(),
            sent: sent
                .into_iter()
                .map(|(to_user, amount)| SentCoins { to_user, amount })
                .collect(),
        })
    }
}

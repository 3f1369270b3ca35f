//! Error types for storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record ("account", "item").
        entity: &'static str,
        /// Key that was looked up.
        id: String,
    },

    /// A uniqueness constraint rejected the write.
    #[error("{entity} already exists: {id}")]
    Conflict {
        /// Kind of record.
        entity: &'static str,
        /// Conflicting key.
        id: String,
    },

    /// Balance too low for the debit.
    #[error("insufficient funds: balance={balance}, required={required}")]
    InsufficientFunds {
        /// Balance read under the row lock.
        balance: i64,
        /// Coins the debit needed.
        required: i64,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Database(format!("migration failed: {err}"))
    }
}

impl From<StoreError> for merch_core::LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientFunds { balance, required } => {
                Self::InsufficientFunds { balance, required }
            }
            StoreError::NotFound {
                entity: "item",
                id,
            } => Self::ItemNotFound { name: id },
            StoreError::Database(msg) => Self::Internal(msg),
            other @ (StoreError::NotFound { .. } | StoreError::Conflict { .. }) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

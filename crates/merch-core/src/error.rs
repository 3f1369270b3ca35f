//! Error types for ledger operations.

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors returned by the ledger, the token service and the authorization gate.
///
/// Callers branch on the variant (or on [`LedgerError::kind`]), never on the
/// message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Transfer amount is zero or negative.
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: i64,
    },

    /// Sender and receiver are the same account.
    #[error("cannot send coins to yourself")]
    SelfTransfer,

    /// Request input failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No catalog item has this exact name.
    #[error("item not found: {name}")]
    ItemNotFound {
        /// The requested item name.
        name: String,
    },

    /// Transfer receiver does not exist.
    #[error("receiver not found: {username}")]
    ReceiverNotFound {
        /// The requested receiver.
        username: String,
    },

    /// The authenticated account no longer exists.
    #[error("account not found: {username}")]
    AccountNotFound {
        /// The token subject.
        username: String,
    },

    /// Balance is lower than the amount to debit.
    #[error("insufficient funds: balance={balance}, required={required}")]
    InsufficientFunds {
        /// Balance at the time of the check.
        balance: i64,
        /// Coins the operation needed.
        required: i64,
    },

    /// Token is malformed, badly signed, missing claims or expired.
    #[error("invalid token")]
    InvalidToken,

    /// Request carries no usable credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Password does not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Storage, hashing or signing failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client input rejected before touching balances.
    Validation,
    /// A referenced item or receiver does not exist.
    NotFound,
    /// Business rule: not enough coins.
    InsufficientFunds,
    /// Caller could not be authenticated.
    Authentication,
    /// Server-side failure.
    Internal,
}

impl LedgerError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount { .. } | Self::SelfTransfer | Self::InvalidRequest(_) => {
                ErrorKind::Validation
            }
            Self::ItemNotFound { .. } | Self::ReceiverNotFound { .. } => ErrorKind::NotFound,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::AccountNotFound { .. }
            | Self::InvalidToken
            | Self::Unauthorized
            | Self::InvalidCredentials => ErrorKind::Authentication,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_token_account_is_an_authentication_failure() {
        let err = LedgerError::AccountNotFound {
            username: "ghost".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn missing_receiver_is_not_found() {
        let err = LedgerError::ReceiverNotFound {
            username: "ghost".into(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "receiver not found: ghost");
    }

    #[test]
    fn self_transfer_is_validation() {
        assert_eq!(LedgerError::SelfTransfer.kind(), ErrorKind::Validation);
        assert_eq!(
            LedgerError::InvalidAmount { amount: -5 }.kind(),
            ErrorKind::Validation
        );
    }
}

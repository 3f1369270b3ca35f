//! Client error types.

/// Errors that can occur when using the merch client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// Token missing, invalid or expired, or the password was wrong.
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Server message.
        message: String,
    },

    /// Not enough coins.
    #[error("insufficient funds: balance={balance}, required={required}")]
    InsufficientFunds {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

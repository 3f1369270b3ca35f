//! API error types and responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use merch_core::LedgerError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, invalid or expired token, or a token for an unknown account.
    #[error("unauthorized")]
    Unauthorized,

    /// Password does not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Unknown catalog item.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// Unknown transfer receiver.
    #[error("receiver not found: {0}")]
    ReceiverNotFound(String),

    /// Insufficient coins.
    #[error("insufficient funds: balance={balance}, required={required}")]
    InsufficientFunds {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
                None,
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::ItemNotFound(_) => (
                StatusCode::BAD_REQUEST,
                "item_not_found",
                self.to_string(),
                None,
            ),
            Self::ReceiverNotFound(_) => (
                StatusCode::BAD_REQUEST,
                "receiver_not_found",
                self.to_string(),
                None,
            ),
            Self::InsufficientFunds { balance, required } => (
                StatusCode::BAD_REQUEST,
                "insufficient_funds",
                self.to_string(),
                Some(serde_json::json!({
                    "balance": balance,
                    "required": required
                })),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount { .. }
            | LedgerError::SelfTransfer
            | LedgerError::InvalidRequest(_) => Self::BadRequest(err.to_string()),
            LedgerError::ItemNotFound { name } => Self::ItemNotFound(name),
            LedgerError::ReceiverNotFound { username } => Self::ReceiverNotFound(username),
            LedgerError::InsufficientFunds { balance, required } => {
                Self::InsufficientFunds { balance, required }
            }
            LedgerError::AccountNotFound { .. }
            | LedgerError::InvalidToken
            | LedgerError::Unauthorized => Self::Unauthorized,
            LedgerError::InvalidCredentials => Self::InvalidCredentials,
            LedgerError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: LedgerError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn business_failures_are_bad_requests() {
        assert_eq!(
            status_of(LedgerError::InsufficientFunds {
                balance: 1,
                required: 2
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(LedgerError::ItemNotFound { name: "x".into() }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(LedgerError::ReceiverNotFound {
                username: "x".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(LedgerError::SelfTransfer), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(LedgerError::InvalidAmount { amount: 0 }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn authentication_failures_are_unauthorized() {
        assert_eq!(status_of(LedgerError::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(LedgerError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(LedgerError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(LedgerError::AccountNotFound {
                username: "ghost".into()
            }),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn internal_errors_are_opaque() {
        assert_eq!(
            status_of(LedgerError::Internal("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

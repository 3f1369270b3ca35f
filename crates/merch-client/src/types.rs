//! Request and response types for the merch client.

use serde::{Deserialize, Serialize};

/// Sign-in request.
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    /// Login name.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Sign-in response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Bearer token.
    pub token: String,
}

/// Purchase response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuyResponse {
    /// Item bought.
    pub item: String,
    /// Coins paid.
    pub price: i64,
    /// Balance after the purchase.
    pub coins: i64,
}

/// Send coins request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCoinRequest {
    /// Receiver's username.
    pub to_user: String,
    /// Coins to send.
    pub amount: i64,
}

/// Send coins response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCoinResponse {
    /// Receiver's username.
    pub to_user: String,
    /// Coins sent.
    pub amount: i64,
    /// Sender's balance after the transfer.
    pub coins: i64,
}

/// One inventory line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventoryItem {
    /// Item name.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Units owned.
    pub quantity: i64,
}

/// Coins received in one transfer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedCoins {
    /// Sender's username.
    pub from_user: String,
    /// Coins received.
    pub amount: i64,
}

/// Coins sent in one transfer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentCoins {
    /// Receiver's username.
    pub to_user: String,
    /// Coins sent.
    pub amount: i64,
}

/// Transfer history split by direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CoinHistory {
    /// Incoming transfers.
    #[serde(default)]
    pub received: Vec<ReceivedCoins>,
    /// Outgoing transfers.
    #[serde(default)]
    pub sent: Vec<SentCoins>,
}

/// Account info response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    /// Current balance.
    pub coins: i64,
    /// Items owned.
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    /// Transfers in and out.
    #[serde(default)]
    pub coin_history: CoinHistory,
}

impl InfoResponse {
    /// Quantity of `item` owned, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, item: &str) -> i64 {
        self.inventory
            .iter()
            .find(|entry| entry.item_type == item)
            .map_or(0, |entry| entry.quantity)
    }
}

/// API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorDetail,
}

/// API error detail.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Additional details.
    pub details: Option<serde_json::Value>,
}

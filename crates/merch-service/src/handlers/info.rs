//! Account info handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use merch_core::{AccountInfo, InventoryEntry, ReceivedCoins, SentCoins};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Inventory line.
#[derive(Debug, Serialize)]
pub struct InventoryItemResponse {
    /// Item name.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Units owned.
    pub quantity: i64,
}

impl From<InventoryEntry> for InventoryItemResponse {
    fn from(entry: InventoryEntry) -> Self {
        Self {
            item_type: entry.item,
            quantity: entry.quantity,
        }
    }
}

/// Coins received from one transfer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedResponse {
    /// Sender's username.
    pub from_user: String,
    /// Coins received.
    pub amount: i64,
}

impl From<ReceivedCoins> for ReceivedResponse {
    fn from(received: ReceivedCoins) -> Self {
        Self {
            from_user: received.from_user,
            amount: received.amount,
        }
    }
}

/// Coins sent in one transfer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentResponse {
    /// Receiver's username.
    pub to_user: String,
    /// Coins sent.
    pub amount: i64,
}

impl From<SentCoins> for SentResponse {
    fn from(sent: SentCoins) -> Self {
        Self {
            to_user: sent.to_user,
            amount: sent.amount,
        }
    }
}

/// Transfer history split by direction.
#[derive(Debug, Serialize)]
pub struct CoinHistoryResponse {
    /// Incoming transfers.
    pub received: Vec<ReceivedResponse>,
    /// Outgoing transfers.
    pub sent: Vec<SentResponse>,
}

/// Account info response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    /// Current balance.
    pub coins: i64,
    /// Items owned.
    pub inventory: Vec<InventoryItemResponse>,
    /// Transfers in and out.
    pub coin_history: CoinHistoryResponse,
}

impl From<AccountInfo> for InfoResponse {
    fn from(info: AccountInfo) -> Self {
        Self {
            coins: info.coins,
            inventory: info.inventory.into_iter().map(Into::into).collect(),
            coin_history: CoinHistoryResponse {
                received: info
                    .coin_history
                    .received
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                sent: info.coin_history.sent.into_iter().map(Into::into).collect(),
            },
        }
    }
}

/// Get the caller's balance, inventory and coin history.
pub async fn get_info(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<InfoResponse>, ApiError> {
    let info = state.ledger.account_info(&auth.identity).await?;
    Ok(Json(info.into()))
}

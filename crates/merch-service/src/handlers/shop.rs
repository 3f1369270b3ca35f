//! Purchase and transfer handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Purchase response.
#[derive(Debug, Serialize)]
pub struct BuyResponse {
    /// Item bought.
    pub item: String,
    /// Coins paid.
    pub price: i64,
    /// Balance after the purchase.
    pub coins: i64,
}

/// Buy one unit of an item.
pub async fn buy_item(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(item): Path<String>,
) -> Result<Json<BuyResponse>, ApiError> {
    let receipt = state.ledger.purchase(&auth.identity, &item).await?;

    Ok(Json(BuyResponse {
        item: receipt.item,
        price: receipt.price,
        coins: receipt.balance,
    }))
}

/// Send coins request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCoinRequest {
    /// Receiver's username.
    pub to_user: String,
    /// Coins to send.
    pub amount: i64,
}

/// Send coins response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCoinResponse {
    /// Receiver's username.
    pub to_user: String,
    /// Coins sent.
    pub amount: i64,
    /// Sender's balance after the transfer.
    pub coins: i64,
}

/// Send coins to another user.
pub async fn send_coin(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    payload: Result<Json<SendCoinRequest>, JsonRejection>,
) -> Result<Json<SendCoinResponse>, ApiError> {
    let Json(request) = payload?;

    let receipt = state
        .ledger
        .transfer(&auth.identity, &request.to_user, request.amount)
        .await?;

    Ok(Json(SendCoinResponse {
        to_user: receipt.to_user,
        amount: receipt.amount,
        coins: receipt.balance,
    }))
}

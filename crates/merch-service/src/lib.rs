//! Merch shop HTTP API service.
//!
//! This crate provides the HTTP API for the merch shop coin ledger:
//!
//! - Sign-in with automatic registration
//! - Buying catalog items with coins
//! - Coin transfers between users
//! - Balance, inventory and transfer history
//!
//! # Authentication
//!
//! `POST /api/auth` returns an HS256 JWT. Every other `/api` route expects it
//! as `Authorization: Bearer <token>`; the [`auth::AuthUser`] extractor resolves
//! it to an [`merch_core::Identity`] that handlers pass into the [`Ledger`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Health handler is async for the router

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod history;
pub mod ledger;
pub mod password;
pub mod routes;
pub mod state;
pub mod token;

pub use auth::{AuthGate, AuthUser};
pub use catalog::Catalog;
pub use config::ServiceConfig;
pub use error::ApiError;
pub use history::HistoryQuery;
pub use ledger::{Ledger, PurchaseReceipt, Session, TransferReceipt};
pub use password::{Argon2Hasher, PasswordHasher};
pub use routes::create_router;
pub use state::AppState;
pub use token::{Claims, TokenService};

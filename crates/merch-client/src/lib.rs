//! Merch shop client SDK.
//!
//! This crate provides a typed client for the merch shop HTTP API.
//!
//! # Example
//!
//! ```no_run
//! use merch_client::MerchClient;
//!
//! # async fn example() -> Result<(), merch_client::ClientError> {
//! let client = MerchClient::new("http://merch-shop:8080")?;
//!
//! let token = client.authenticate("alice", "password").await?;
//! client.buy(&token, "cup").await?;
//! client.send_coins(&token, "bob", 100).await?;
//!
//! let info = client.info(&token).await?;
//! println!("Balance: {} coins", info.coins);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, MerchClient};
pub use error::ClientError;
pub use types::*;

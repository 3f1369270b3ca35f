//! Catalog items.

use serde::{Deserialize, Serialize};

/// A purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique, case-sensitive item name.
    pub name: String,
    /// Price in coins.
    pub price: i64,
}

impl CatalogItem {
    /// Create a catalog item.
    #[must_use]
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// The merch catalog the service seeds at startup.
#[must_use]
pub fn default_catalog() -> Vec<CatalogItem> {
    [
        ("t-shirt", 80),
        ("cup", 20),
        ("book", 50),
        ("pen", 10),
        ("powerbank", 200),
        ("hoody", 300),
        ("umbrella", 200),
        ("socks", 10),
        ("wallet", 50),
        ("pink-hoody", 500),
    ]
    .into_iter()
    .map(|(name, price)| CatalogItem::new(name, price))
    .collect()
}

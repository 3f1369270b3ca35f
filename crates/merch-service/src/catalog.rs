//! Catalog lookup.

use std::sync::Arc;

use merch_core::{CatalogItem, LedgerError, Result};
use merch_store::Store;

/// Read-only view of the merch catalog.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn Store>,
}

impl Catalog {
    /// Create a catalog backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Find an item by exact, case-sensitive name.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ItemNotFound` if no item has this name.
    pub async fn find_by_name(&self, name: &str) -> Result<CatalogItem> {
        self.store
            .get_item(name)
            .await?
            .ok_or_else(|| LedgerError::ItemNotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merch_core::default_catalog;
    use merch_store::MemoryStore;

    fn catalog() -> Catalog {
        Catalog::new(Arc::new(MemoryStore::with_catalog(default_catalog())))
    }

    #[tokio::test]
    async fn finds_item_by_exact_name() {
        let item = catalog().find_by_name("pink-hoody").await.unwrap();
        assert_eq!(item.price, 500);
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let result = catalog().find_by_name("Cup").await;
        assert_eq!(
            result,
            Err(LedgerError::ItemNotFound { name: "Cup".into() })
        );
    }

    #[tokio::test]
    async fn unknown_item_is_not_found() {
        let result = catalog().find_by_name("spaceship").await;
        assert!(matches!(result, Err(LedgerError::ItemNotFound { .. })));
    }
}

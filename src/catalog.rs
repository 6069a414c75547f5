//! Read-only access to the menu catalog. The core consumes category and
//! item records; it never mutates them. Idempotent reads retry once
//! silently on retryable store failures.

use crate::model::{Category, MenuFilter, MenuItem, MenuItemId};
use crate::store::{retry_read, with_timeout, PersistentStore, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// Menu catalog reader.
#[derive(Clone)]
pub struct MenuCatalog {
    store: Arc<dyn PersistentStore>,
    store_timeout: Duration,
}

impl MenuCatalog {
    pub fn new(store: Arc<dyn PersistentStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    /// Active categories, ordered for display.
    pub async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let store = &self.store;
        let limit = self.store_timeout;
        retry_read(|| with_timeout(limit, store.categories_list())).await
    }

    /// Items matching `filter`, ordered for display.
    pub async fn items(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>, StoreError> {
        let store = &self.store;
        let limit = self.store_timeout;
        retry_read(|| with_timeout(limit, store.menu_items_list(filter))).await
    }

    /// Available featured items (the storefront's front-page strip).
    pub async fn featured(&self) -> Result<Vec<MenuItem>, StoreError> {
        self.items(&MenuFilter {
            available_only: true,
            featured_only: true,
            ..MenuFilter::default()
        })
        .await
    }

    /// One item by id.
    pub async fn item(&self, id: &MenuItemId) -> Result<MenuItem, StoreError> {
        let store = &self.store;
        let limit = self.store_timeout;
        retry_read(|| with_timeout(limit, store.menu_item_get(id))).await
    }
}

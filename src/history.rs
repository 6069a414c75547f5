//! Read-only order history: persisted orders joined with their snapshot
//! lines. Status transitions belong to an external fulfillment process.

use crate::model::{Order, OrderId, OrderLine, UserId};
use crate::store::{retry_read, with_timeout, PersistentStore, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// An order header with its line rows.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

/// Order history reader.
#[derive(Clone)]
pub struct OrderHistory {
    store: Arc<dyn PersistentStore>,
    store_timeout: Duration,
}

impl OrderHistory {
    pub fn new(store: Arc<dyn PersistentStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    /// All orders placed by `user`, newest first, each with its lines.
    pub async fn orders_for(&self, user: &UserId) -> Result<Vec<OrderWithLines>, StoreError> {
        let store = &self.store;
        let limit = self.store_timeout;
        let orders = retry_read(|| with_timeout(limit, store.orders_for_user(user))).await?;
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let lines = retry_read(|| with_timeout(limit, store.order_items_for(&order.id))).await?;
            result.push(OrderWithLines { order, lines });
        }
        Ok(result)
    }

    /// One order with its lines.
    pub async fn order(&self, id: &OrderId) -> Result<OrderWithLines, StoreError> {
        let store = &self.store;
        let limit = self.store_timeout;
        let order = retry_read(|| with_timeout(limit, store.order_get(id))).await?;
        let lines = retry_read(|| with_timeout(limit, store.order_items_for(id))).await?;
        Ok(OrderWithLines { order, lines })
    }
}

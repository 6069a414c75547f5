//! # Persistent Store Contract
//!
//! The core never talks to the remote data service directly; it goes through
//! the [`PersistentStore`] trait, a logical table API over the user's cart,
//! the menu catalog, and orders. Every operation returns either a success
//! payload or a typed [`StoreError`]. No operation offers multi-table
//! atomicity, which is exactly what forces the explicit partial-failure
//! handling in the checkout sequence.
//!
//! # Architecture Note
//! Keeping the seam a trait lets the cart actor and the checkout
//! orchestrator be tested against the deterministic [`MemoryStore`] with
//! injected faults, and lets a real remote client slot in unchanged.

use crate::model::{
    CartEntry, CartLineId, CartLinePatch, Category, MenuFilter, MenuItem, MenuItemId, NewCartLine,
    NewOrder, NewOrderLine, Order, OrderId, OrderLine, UserId,
};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub mod memory;

pub use memory::{MemoryStore, StoreOp};

/// Errors surfaced by the persistent store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The referenced row does not exist.
    #[error("row not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint was violated (e.g. duplicate order number).
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// The remote service could not be reached or failed mid-call.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A bounded per-call deadline elapsed. Treated like a network failure.
    #[error("store call timed out")]
    Timeout,
}

impl StoreError {
    /// Whether a caller may retry the operation without observing different
    /// semantics. Only I/O-shaped failures qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout)
    }
}

/// Remote relational data service exposing table-like read/insert/update
/// operations over carts, orders, order items, and the menu catalog.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// All cart lines owned by `user`, each joined with its menu item.
    async fn cart_list(&self, user: &UserId) -> Result<Vec<CartEntry>, StoreError>;

    /// Inserts a new cart line, returning the stored row joined with its item.
    async fn cart_insert(&self, line: NewCartLine) -> Result<CartEntry, StoreError>;

    /// Applies `patch` to an existing line and returns the authoritative
    /// updated row. `add_quantity` is applied against the store's current
    /// quantity, not the caller's view of it.
    async fn cart_update(
        &self,
        id: &CartLineId,
        patch: CartLinePatch,
    ) -> Result<CartEntry, StoreError>;

    /// Deletes one cart line.
    async fn cart_delete(&self, id: &CartLineId) -> Result<(), StoreError>;

    /// Deletes every cart line owned by `user`. A no-op on an empty cart.
    async fn cart_clear(&self, user: &UserId) -> Result<(), StoreError>;

    /// Fetches one menu item.
    async fn menu_item_get(&self, id: &MenuItemId) -> Result<MenuItem, StoreError>;

    /// Lists menu items matching `filter`, ordered by sort order.
    async fn menu_items_list(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>, StoreError>;

    /// Lists active categories, ordered by sort order.
    async fn categories_list(&self) -> Result<Vec<Category>, StoreError>;

    /// Inserts an order header. Must reject a duplicate `order_number`
    /// with [`StoreError::Conflict`].
    async fn order_insert(&self, order: NewOrder) -> Result<Order, StoreError>;

    /// Inserts the line rows for an existing order as one batch.
    async fn order_items_insert_many(
        &self,
        order_id: &OrderId,
        lines: Vec<NewOrderLine>,
    ) -> Result<Vec<OrderLine>, StoreError>;

    /// Fetches one order header.
    async fn order_get(&self, id: &OrderId) -> Result<Order, StoreError>;

    /// All orders placed by `user`, newest first.
    async fn orders_for_user(&self, user: &UserId) -> Result<Vec<Order>, StoreError>;

    /// The line rows attached to an order.
    async fn order_items_for(&self, order_id: &OrderId) -> Result<Vec<OrderLine>, StoreError>;
}

/// Bounds a store call with a per-call deadline, mapping elapse to
/// [`StoreError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout),
    }
}

/// Runs an idempotent read, silently retrying once on a retryable failure.
/// Mutating calls must not go through this.
pub async fn retry_read<T, F, Fut>(op: F) -> Result<T, StoreError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    match op().await {
        Err(e) if e.is_retryable() => {
            debug!(error = %e, "idempotent read failed, retrying once");
            op().await
        }
        other => other,
    }
}

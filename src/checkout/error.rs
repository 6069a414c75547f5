//! Error types for order placement.

use crate::cart_actor::CartError;
use crate::model::OrderId;
use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur while placing an order.
///
/// The variants distinguish which half of the non-atomic write sequence
/// failed: [`OrderCreationFailed`](CheckoutError::OrderCreationFailed) means
/// nothing was persisted, while
/// [`PartialOrderFailure`](CheckoutError::PartialOrderFailure) means an
/// order header exists with no line items and needs reconciliation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    /// No identity is bound; ordering requires a signed-in user.
    #[error("not signed in")]
    NotAuthenticated,

    /// The cart has no lines to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Delivery address or phone was blank after trimming.
    #[error("delivery address and phone are required")]
    MissingDeliveryInfo,

    /// The generated order number collided twice in a row.
    #[error("order number collided twice")]
    OrderNumberCollision,

    /// The header insert failed; no side effects, the cart is untouched.
    #[error("order creation failed: {0}")]
    OrderCreationFailed(StoreError),

    /// The header was persisted but the line insert failed. The order
    /// exists with zero lines; the cart was deliberately not cleared.
    #[error("order {order_id} was created but its items were not: {source}")]
    PartialOrderFailure { order_id: OrderId, source: StoreError },

    /// The cart actor could not be reached or reported a failure.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),
}

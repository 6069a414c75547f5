//! # Order Placement
//!
//! The only multi-step write sequence in the system: validate, persist an
//! order header, persist the snapshot-priced line items, then clear the
//! cart. The store offers no cross-table transaction, so the two inserts
//! are not atomic. The orchestrator's job is to surface exactly which half
//! failed instead of collapsing everything into one generic error.
//!
//! Sequence of [`CheckoutService::place_order`]:
//!
//! 1. Precondition checks, resolved locally with no remote call: identity
//!    bound, cart non-empty, delivery address and phone non-blank.
//! 2. Generate an order number (date + sub-second suffix, best-effort
//!    unique).
//! 3. Snapshot-price every cart line from the cart's cached menu item,
//!    never a fresh catalog fetch, so the total matches what the user saw.
//! 4. Insert the header (status `pending`). A store conflict on the order
//!    number regenerates and retries exactly once.
//! 5. Insert the line rows. A failure here is a
//!    [`CheckoutError::PartialOrderFailure`] carrying the orphaned order id.
//! 6. Clear the cart. A clear failure is logged, never an order failure;
//!    the order is valid and stale lines reconcile on the next refresh.
//! 7. Hand the created order back for the payment flow.
//!
//! There is no cancellation path once step 4 has started.

use crate::clients::CartClient;
use crate::model::{
    NewOrder, NewOrderLine, Order, OrderStatus, PaymentMethod, PaymentStatus, UserId,
};
use crate::pricing;
use crate::store::{with_timeout, PersistentStore, StoreError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub mod error;

pub use error::CheckoutError;

/// Checkout form fields. Address and phone are validated non-blank after
/// trimming.
#[derive(Debug, Clone)]
pub struct DeliveryDetails {
    pub delivery_address: String,
    pub phone: String,
    pub special_instructions: Option<String>,
}

/// Order placement orchestrator. Constructed once with its dependencies
/// (store, cart client, identity) passed in explicitly.
#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn PersistentStore>,
    cart: CartClient,
    identity: Option<UserId>,
    delivery_fee: Decimal,
    store_timeout: Duration,
}

impl CheckoutService {
    pub fn new(
        store: Arc<dyn PersistentStore>,
        cart: CartClient,
        identity: Option<UserId>,
        delivery_fee: Decimal,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            cart,
            identity,
            delivery_fee,
            store_timeout,
        }
    }

    /// Turns the current cart into a persisted order and empties the cart.
    /// Returns the created order for the payment hand-off.
    #[instrument(skip(self, details))]
    pub async fn place_order(&self, details: DeliveryDetails) -> Result<Order, CheckoutError> {
        // Fail fast: everything here resolves against local state.
        let user = self.identity.ok_or(CheckoutError::NotAuthenticated)?;
        let entries = self.cart.entries().await?;
        if entries.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let delivery_address = details.delivery_address.trim();
        let phone = details.phone.trim();
        if delivery_address.is_empty() || phone.is_empty() {
            return Err(CheckoutError::MissingDeliveryInfo);
        }

        // Snapshot prices from the cached cart lines, not the live catalog.
        let lines: Vec<NewOrderLine> = entries
            .iter()
            .map(|e| NewOrderLine {
                menu_item_id: e.menu_item.id,
                quantity: e.line.quantity,
                unit_price: e.menu_item.price,
                total_price: pricing::line_total(e.menu_item.price, e.line.quantity),
                special_instructions: e.line.special_instructions.clone(),
            })
            .collect();
        let total = pricing::order_total(pricing::cart_total(&entries), self.delivery_fee);

        let order = self
            .insert_header(NewOrder {
                user_id: user,
                order_number: order_number_at(Utc::now()),
                status: OrderStatus::Pending,
                total_amount: total,
                delivery_address: delivery_address.to_string(),
                phone: phone.to_string(),
                special_instructions: details.special_instructions,
                payment_method: PaymentMethod::WeChat,
                payment_status: PaymentStatus::Pending,
            })
            .await?;
        info!(order = %order.id, number = %order.order_number, %total, "Order header created");

        let line_count = lines.len();
        match with_timeout(
            self.store_timeout,
            self.store.order_items_insert_many(&order.id, lines),
        )
        .await
        {
            Ok(_) => debug!(order = %order.id, lines = line_count, "Order lines persisted"),
            Err(source) => {
                warn!(order = %order.id, error = %source, "Order header exists but line insert failed");
                return Err(CheckoutError::PartialOrderFailure {
                    order_id: order.id,
                    source,
                });
            }
        }

        if let Err(e) = self.cart.clear().await {
            // The order is valid; stale lines reconcile on the next refresh.
            warn!(order = %order.id, error = %e, "Cart clear failed after successful order");
        }

        info!(order = %order.id, number = %order.order_number, "Order placed");
        Ok(order)
    }

    /// Inserts the header, regenerating the order number and retrying
    /// exactly once on a uniqueness conflict.
    async fn insert_header(&self, new_order: NewOrder) -> Result<Order, CheckoutError> {
        match self.try_insert(new_order.clone()).await {
            Err(StoreError::Conflict(_)) => {
                warn!(number = %new_order.order_number, "Order number collided, regenerating");
                let retry = NewOrder {
                    order_number: order_number_at(Utc::now()),
                    ..new_order
                };
                match self.try_insert(retry).await {
                    Ok(order) => Ok(order),
                    Err(StoreError::Conflict(_)) => Err(CheckoutError::OrderNumberCollision),
                    Err(e) => Err(CheckoutError::OrderCreationFailed(e)),
                }
            }
            Err(e) => Err(CheckoutError::OrderCreationFailed(e)),
            Ok(order) => Ok(order),
        }
    }

    async fn try_insert(&self, new_order: NewOrder) -> Result<Order, StoreError> {
        with_timeout(self.store_timeout, self.store.order_insert(new_order)).await
    }
}

/// Human-legible, collision-resistant order number: `ORD` + calendar day
/// (8 digits, UTC) + the last 6 digits of epoch milliseconds. Best-effort
/// uniqueness; the store's constraint is the real guard.
fn order_number_at(now: DateTime<Utc>) -> String {
    let date = now.format("%Y%m%d");
    let suffix = now.timestamp_millis().rem_euclid(1_000_000);
    format!("ORD{date}{suffix:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn order_number_shape() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let number = order_number_at(now);
        assert!(number.starts_with("ORD20250314"));
        assert_eq!(number.len(), "ORD".len() + 8 + 6);
        assert!(number["ORD".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn order_number_suffix_is_zero_padded() {
        // Epoch millis ending in 000042 must keep their leading zeros.
        let now = Utc.timestamp_millis_opt(1_700_000_000_042).unwrap();
        let number = order_number_at(now);
        assert!(number.ends_with("000042"));
    }
}

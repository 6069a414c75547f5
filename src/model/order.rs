use crate::model::{MenuItemId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Type-safe identifier for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe identifier for order lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderLineId(pub Uuid);

impl OrderLineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderLineId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for OrderLineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fulfillment state of an order. `Pending` is the only legal initial
/// value; transitions past it belong to an external fulfillment process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// How the order will be paid. Payment happens out-of-band (scan-to-pay);
/// no settlement confirmation is integrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    WeChat,
    Alipay,
    Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// The order header. Total amount and line items are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Human-readable, unique. See `checkout::order_number_at` for the scheme.
    pub order_number: String,
    pub status: OrderStatus,
    /// Equals the sum of the order's line totals at creation time.
    pub total_amount: Decimal,
    pub delivery_address: String,
    pub phone: String,
    pub special_instructions: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A price-snapshotted copy of a cart line, permanently attached to one
/// order. `unit_price` is copied from the cart's cached menu item at
/// placement time; later catalog price changes never touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// `round2(unit_price * quantity)`.
    pub total_price: Decimal,
    pub special_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable order header fields. The store assigns id and timestamps and
/// must reject a duplicate `order_number` with [`StoreError::Conflict`].
///
/// [`StoreError::Conflict`]: crate::store::StoreError::Conflict
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub order_number: String,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub delivery_address: String,
    pub phone: String,
    pub special_instructions: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
}

/// Insertable order line fields; the parent order id is supplied alongside
/// the batch at insert time.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub special_instructions: Option<String>,
}

//! Mailbox messages for the cart actor.

use crate::cart_actor::CartError;
use crate::model::{CartEntry, CartLineId, MenuItemId};
use rust_decimal::Decimal;
use tokio::sync::oneshot;

/// One-shot response channel carried by every request.
pub type Respond<T> = oneshot::Sender<Result<T, CartError>>;

/// Requests the [`CartClient`](crate::clients::CartClient) sends to the
/// actor. Each carries its own `respond_to`, so the caller awaits exactly
/// the operation it issued.
#[derive(Debug)]
pub enum CartRequest {
    /// Add a menu item, merging into an existing line for the same item.
    Add {
        menu_item_id: MenuItemId,
        quantity: u32,
        special_instructions: Option<String>,
        respond_to: Respond<CartEntry>,
    },
    /// Set a line's quantity to an absolute value >= 1.
    UpdateQuantity {
        line_id: CartLineId,
        quantity: u32,
        respond_to: Respond<CartEntry>,
    },
    /// Delete a line. Idempotent: removing an absent line succeeds.
    Remove {
        line_id: CartLineId,
        respond_to: Respond<()>,
    },
    /// Delete every line owned by the current identity.
    Clear { respond_to: Respond<()> },
    /// Current cart contents (the checkout snapshot source).
    Entries {
        respond_to: Respond<Vec<CartEntry>>,
    },
    /// True sum of quantities across all lines.
    ItemCount { respond_to: Respond<u32> },
    /// Cart total per the pricing rules.
    TotalPrice { respond_to: Respond<Decimal> },
    /// Re-fetch the cart from the store, replacing the local mirror.
    Refresh {
        respond_to: Respond<Vec<CartEntry>>,
    },
}

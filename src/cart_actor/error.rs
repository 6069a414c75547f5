//! Error types for the cart actor.

use crate::model::{CartLineId, MenuItemId};
use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    /// No identity is bound to the cart; mutations require a signed-in user.
    #[error("not signed in")]
    NotAuthenticated,

    /// Quantities start at 1; deletion goes through the remove path.
    #[error("invalid quantity {0}: minimum is 1, use remove to delete a line")]
    InvalidQuantity(u32),

    /// The cart line does not belong to the current identity's cart.
    #[error("cart line not found: {0}")]
    NotFound(CartLineId),

    /// The referenced menu item does not exist in the catalog.
    #[error("unknown menu item: {0}")]
    UnknownMenuItem(MenuItemId),

    /// The menu item exists but is not currently orderable.
    #[error("menu item not available: {0}")]
    ItemUnavailable(MenuItemId),

    /// The remote write failed; local cart state was left unchanged.
    #[error("cart persistence error: {0}")]
    Store(#[from] StoreError),

    /// The actor's mailbox is closed.
    #[error("cart actor closed")]
    ActorClosed,

    /// The actor dropped the response channel.
    #[error("cart actor dropped response channel")]
    ActorDropped,
}

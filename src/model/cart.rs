use crate::model::{MenuItem, MenuItemId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Type-safe identifier for cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartLineId(pub Uuid);

impl CartLineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CartLineId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CartLineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One (user, menu item) pairing in a cart.
///
/// At most one line exists per pair; adding an item already in the cart
/// merges into the existing line's quantity instead of creating a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub user_id: UserId,
    pub menu_item_id: MenuItemId,
    /// Always >= 1. Deletion goes through the remove path, never quantity 0.
    pub quantity: u32,
    pub special_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with the menu item it references, as the store
/// returns it. The embedded [`MenuItem`] is the price the user saw and the
/// snapshot source at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub line: CartLine,
    pub menu_item: MenuItem,
}

/// Payload for inserting a new cart line. The store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewCartLine {
    pub user_id: UserId,
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub special_instructions: Option<String>,
}

/// Fields to change on an existing cart line.
///
/// `set_quantity` is absolute; `add_quantity` is applied by the store
/// against its current row, so concurrent sessions incrementing the same
/// line do not lose updates.
#[derive(Debug, Clone, Default)]
pub struct CartLinePatch {
    pub set_quantity: Option<u32>,
    pub add_quantity: Option<u32>,
    pub special_instructions: Option<String>,
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Type-safe identifier for menu categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub Uuid);

impl CategoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe identifier for menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuItemId(pub Uuid);

impl MenuItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MenuItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MenuItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A menu category as stored remotely. Read-only from the core's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name_en: String,
    pub name_zh: String,
    pub description_en: Option<String>,
    pub description_zh: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A sellable menu item. Immutable within a session; the cart caches the
/// row it saw at add-time and checkout snapshots prices from that cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub category_id: Option<CategoryId>,
    pub name_en: String,
    pub name_zh: String,
    pub description_en: Option<String>,
    pub description_zh: Option<String>,
    /// Unit price with 2-decimal currency semantics. Non-negative.
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub is_featured: bool,
    pub preparation_minutes: Option<u32>,
    pub calories: Option<u32>,
    pub ingredients_en: Vec<String>,
    pub ingredients_zh: Vec<String>,
    pub allergens: Vec<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Creates an active category with generated id and timestamps.
    pub fn new(name_en: impl Into<String>, name_zh: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name_en: name_en.into(),
            name_zh: name_zh.into(),
            description_en: None,
            description_zh: None,
            image_url: None,
            sort_order: 0,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

impl MenuItem {
    /// Creates an available, non-featured item with generated id and
    /// timestamps. Optional detail fields start empty.
    pub fn new(
        name_en: impl Into<String>,
        name_zh: impl Into<String>,
        price: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: MenuItemId::new(),
            category_id: None,
            name_en: name_en.into(),
            name_zh: name_zh.into(),
            description_en: None,
            description_zh: None,
            price,
            image_url: None,
            is_available: true,
            is_featured: false,
            preparation_minutes: None,
            calories: None,
            ingredients_en: Vec::new(),
            ingredients_zh: Vec::new(),
            allergens: Vec::new(),
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Filter for catalog listings. `Default` selects every item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuFilter {
    pub category: Option<CategoryId>,
    pub available_only: bool,
    pub featured_only: bool,
}

//! In-memory [`PersistentStore`] used by the demo binary and the test
//! suites.
//!
//! # Testing Strategy
//! Real remote failures (network partitions, constraint violations,
//! timeouts) are hard to reproduce on demand, so the store carries a fault
//! queue: `fail_next(op)` makes the next call of that operation fail with a
//! chosen error, deterministically. A write counter makes "zero remote
//! writes happened" assertable.

use crate::model::{
    CartEntry, CartLine, CartLineId, CartLinePatch, Category, MenuFilter, MenuItem, MenuItemId,
    NewCartLine, NewOrder, NewOrderLine, Order, OrderId, OrderLine, OrderLineId, UserId,
};
use crate::store::{PersistentStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

/// Operations a fault can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    CartList,
    CartInsert,
    CartUpdate,
    CartDelete,
    CartClear,
    MenuItemGet,
    MenuItemsList,
    CategoriesList,
    OrderInsert,
    OrderItemsInsert,
    OrderGet,
    OrdersForUser,
    OrderItemsFor,
}

struct Fault {
    op: StoreOp,
    error: StoreError,
}

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    menu_items: HashMap<MenuItemId, MenuItem>,
    cart_lines: HashMap<CartLineId, CartLine>,
    orders: HashMap<OrderId, Order>,
    order_numbers: HashSet<String>,
    order_lines: HashMap<OrderLineId, OrderLine>,
    faults: VecDeque<Fault>,
    writes: u64,
}

impl Tables {
    /// Pops and raises the front fault if it targets `op`. Faults for other
    /// operations stay queued so a test can aim past intermediate calls.
    fn take_fault(&mut self, op: StoreOp) -> Result<(), StoreError> {
        if self.faults.front().is_some_and(|f| f.op == op) {
            if let Some(fault) = self.faults.pop_front() {
                return Err(fault.error);
            }
        }
        Ok(())
    }

    fn entry_for(&self, line: &CartLine) -> Result<CartEntry, StoreError> {
        let menu_item = self
            .menu_items
            .get(&line.menu_item_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("menu item {}", line.menu_item_id)))?;
        Ok(CartEntry {
            line: line.clone(),
            menu_item,
        })
    }
}

/// Mutex-guarded in-memory tables. Cheap to share behind an `Arc`.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a catalog row. Test/demo setup only; the core never writes menu data.
    pub fn seed_menu_item(&self, item: MenuItem) {
        self.tables
            .lock()
            .unwrap()
            .menu_items
            .insert(item.id, item);
    }

    pub fn seed_category(&self, category: Category) {
        self.tables.lock().unwrap().categories.push(category);
    }

    /// Makes the next `op` call fail with `StoreError::Unavailable`.
    pub fn fail_next(&self, op: StoreOp) {
        self.fail_next_with(op, StoreError::Unavailable("injected fault".to_string()));
    }

    /// Makes the next `op` call fail with a chosen error.
    pub fn fail_next_with(&self, op: StoreOp, error: StoreError) {
        self.tables
            .lock()
            .unwrap()
            .faults
            .push_back(Fault { op, error });
    }

    /// Number of mutating calls that reached the tables.
    pub fn writes(&self) -> u64 {
        self.tables.lock().unwrap().writes
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn cart_list(&self, user: &UserId) -> Result<Vec<CartEntry>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::CartList)?;
        let mut lines: Vec<CartLine> = tables
            .cart_lines
            .values()
            .filter(|l| l.user_id == *user)
            .cloned()
            .collect();
        lines.sort_by_key(|l| l.created_at);
        lines.iter().map(|l| tables.entry_for(l)).collect()
    }

    async fn cart_insert(&self, line: NewCartLine) -> Result<CartEntry, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::CartInsert)?;
        tables.writes += 1;
        let now = Utc::now();
        let row = CartLine {
            id: CartLineId::new(),
            user_id: line.user_id,
            menu_item_id: line.menu_item_id,
            quantity: line.quantity,
            special_instructions: line.special_instructions,
            created_at: now,
            updated_at: now,
        };
        let entry = tables.entry_for(&row)?;
        tables.cart_lines.insert(row.id, row);
        Ok(entry)
    }

    async fn cart_update(
        &self,
        id: &CartLineId,
        patch: CartLinePatch,
    ) -> Result<CartEntry, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::CartUpdate)?;
        tables.writes += 1;
        let row = tables
            .cart_lines
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("cart line {id}")))?;
        if let Some(quantity) = patch.set_quantity {
            row.quantity = quantity;
        }
        if let Some(delta) = patch.add_quantity {
            // Applied against the stored row, so a stale caller cannot
            // overwrite another session's increment.
            row.quantity += delta;
        }
        if let Some(instructions) = patch.special_instructions {
            row.special_instructions = Some(instructions);
        }
        row.updated_at = Utc::now();
        let row = row.clone();
        tables.entry_for(&row)
    }

    async fn cart_delete(&self, id: &CartLineId) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::CartDelete)?;
        tables.writes += 1;
        tables
            .cart_lines
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("cart line {id}")))
    }

    async fn cart_clear(&self, user: &UserId) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::CartClear)?;
        tables.writes += 1;
        tables.cart_lines.retain(|_, l| l.user_id != *user);
        Ok(())
    }

    async fn menu_item_get(&self, id: &MenuItemId) -> Result<MenuItem, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::MenuItemGet)?;
        tables
            .menu_items
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("menu item {id}")))
    }

    async fn menu_items_list(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::MenuItemsList)?;
        let mut items: Vec<MenuItem> = tables
            .menu_items
            .values()
            .filter(|i| filter.category.map_or(true, |c| i.category_id == Some(c)))
            .filter(|i| !filter.available_only || i.is_available)
            .filter(|i| !filter.featured_only || i.is_featured)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name_en.cmp(&b.name_en))
        });
        Ok(items)
    }

    async fn categories_list(&self) -> Result<Vec<Category>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::CategoriesList)?;
        let mut categories: Vec<Category> = tables
            .categories
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.sort_order);
        Ok(categories)
    }

    async fn order_insert(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::OrderInsert)?;
        tables.writes += 1;
        if tables.order_numbers.contains(&order.order_number) {
            return Err(StoreError::Conflict(format!(
                "order_number {}",
                order.order_number
            )));
        }
        let now = Utc::now();
        let row = Order {
            id: OrderId::new(),
            user_id: order.user_id,
            order_number: order.order_number,
            status: order.status,
            total_amount: order.total_amount,
            delivery_address: order.delivery_address,
            phone: order.phone,
            special_instructions: order.special_instructions,
            estimated_delivery: None,
            payment_method: order.payment_method,
            payment_status: order.payment_status,
            created_at: now,
            updated_at: now,
        };
        tables.order_numbers.insert(row.order_number.clone());
        tables.orders.insert(row.id, row.clone());
        Ok(row)
    }

    async fn order_items_insert_many(
        &self,
        order_id: &OrderId,
        lines: Vec<NewOrderLine>,
    ) -> Result<Vec<OrderLine>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::OrderItemsInsert)?;
        tables.writes += 1;
        if !tables.orders.contains_key(order_id) {
            return Err(StoreError::NotFound(format!("order {order_id}")));
        }
        let now = Utc::now();
        let rows: Vec<OrderLine> = lines
            .into_iter()
            .map(|l| OrderLine {
                id: OrderLineId::new(),
                order_id: *order_id,
                menu_item_id: l.menu_item_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
                total_price: l.total_price,
                special_instructions: l.special_instructions,
                created_at: now,
            })
            .collect();
        for row in &rows {
            tables.order_lines.insert(row.id, row.clone());
        }
        Ok(rows)
    }

    async fn order_get(&self, id: &OrderId) -> Result<Order, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::OrderGet)?;
        tables
            .orders
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("order {id}")))
    }

    async fn orders_for_user(&self, user: &UserId) -> Result<Vec<Order>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::OrdersForUser)?;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| o.user_id == *user)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn order_items_for(&self, order_id: &OrderId) -> Result<Vec<OrderLine>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.take_fault(StoreOp::OrderItemsFor)?;
        let mut lines: Vec<OrderLine> = tables
            .order_lines
            .values()
            .filter(|l| l.order_id == *order_id)
            .cloned()
            .collect();
        lines.sort_by_key(|l| l.created_at);
        Ok(lines)
    }
}

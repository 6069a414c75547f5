use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use storefront::checkout::{CheckoutError, DeliveryDetails};
use storefront::lifecycle::{Storefront, StorefrontConfig};
use storefront::model::{MenuItem, MenuItemId, OrderStatus, PaymentMethod, PaymentStatus, UserId};
use storefront::store::{MemoryStore, StoreError, StoreOp};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn seeded_store() -> (Arc<MemoryStore>, MenuItemId, MenuItemId) {
    let store = Arc::new(MemoryStore::new());
    let kung_pao = MenuItem::new("Kung Pao Chicken", "宫保鸡丁", dec("38.00"));
    let spring_roll = MenuItem::new("Spring Roll", "春卷", dec("12.50"));
    let (kung_pao_id, spring_roll_id) = (kung_pao.id, spring_roll.id);
    store.seed_menu_item(kung_pao);
    store.seed_menu_item(spring_roll);
    (store, kung_pao_id, spring_roll_id)
}

fn details() -> DeliveryDetails {
    DeliveryDetails {
        delivery_address: "123 Main St".to_string(),
        phone: "555-0100".to_string(),
        special_instructions: None,
    }
}

/// The reference scenario: 2 x 38.00 + 1 x 12.50 becomes one order of
/// 88.50 with lines 76.00 and 12.50, and the cart ends up empty.
#[tokio::test]
async fn place_order_persists_header_lines_and_clears_the_cart() {
    let (store, kung_pao, spring_roll) = seeded_store();
    let user = UserId::new();
    let system = Storefront::new(store.clone(), Some(user), StorefrontConfig::default());

    system.cart.add_item(kung_pao, 2, None).await.unwrap();
    system.cart.add_item(spring_roll, 1, None).await.unwrap();
    assert_eq!(system.cart.total_price().await.unwrap(), dec("88.50"));

    let order = system.checkout.place_order(details()).await.unwrap();

    assert_eq!(order.user_id, user);
    assert_eq!(order.total_amount, dec("88.50"));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_method, PaymentMethod::WeChat);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert!(order.order_number.starts_with("ORD"));
    assert_eq!(order.order_number.len(), 17);

    let placed = system.orders.order(&order.id).await.unwrap();
    assert_eq!(placed.lines.len(), 2);
    let mut totals: Vec<Decimal> = placed.lines.iter().map(|l| l.total_price).collect();
    totals.sort();
    assert_eq!(totals, vec![dec("12.50"), dec("76.00")]);
    let line_sum: Decimal = placed.lines.iter().map(|l| l.total_price).sum();
    assert_eq!(
        placed.order.total_amount, line_sum,
        "Header total must equal the sum of line totals"
    );

    assert_eq!(system.cart.item_count().await.unwrap(), 0);
    assert!(system.cart.refresh().await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

/// An empty cart fails fast with zero remote writes.
#[tokio::test]
async fn empty_cart_fails_before_any_write() {
    let (store, _, _) = seeded_store();
    let system = Storefront::new(store.clone(), Some(UserId::new()), StorefrontConfig::default());

    let writes_before = store.writes();
    let result = system.checkout.place_order(details()).await;
    assert_eq!(result, Err(CheckoutError::EmptyCart));
    assert_eq!(store.writes(), writes_before);

    system.shutdown().await.unwrap();
}

/// Blank delivery fields (after trimming) are rejected locally.
#[tokio::test]
async fn blank_delivery_info_is_rejected() {
    let (store, kung_pao, _) = seeded_store();
    let system = Storefront::new(store.clone(), Some(UserId::new()), StorefrontConfig::default());
    system.cart.add_item(kung_pao, 1, None).await.unwrap();

    let writes_before = store.writes();
    for (address, phone) in [("   ", "555-0100"), ("123 Main St", "\t")] {
        let result = system
            .checkout
            .place_order(DeliveryDetails {
                delivery_address: address.to_string(),
                phone: phone.to_string(),
                special_instructions: None,
            })
            .await;
        assert_eq!(result, Err(CheckoutError::MissingDeliveryInfo));
    }
    assert_eq!(store.writes(), writes_before);

    system.shutdown().await.unwrap();
}

/// No identity, no order.
#[tokio::test]
async fn place_order_requires_identity() {
    let (store, _, _) = seeded_store();
    let system = Storefront::new(store, None, StorefrontConfig::default());

    let result = system.checkout.place_order(details()).await;
    assert_eq!(result, Err(CheckoutError::NotAuthenticated));

    system.shutdown().await.unwrap();
}

/// If the line insert fails after the header was persisted, the failure is
/// surfaced as a partial order referencing the orphaned header, and the
/// cart is left intact for recovery.
#[tokio::test]
async fn failed_line_insert_surfaces_partial_order() {
    let (store, kung_pao, spring_roll) = seeded_store();
    let system = Storefront::new(store.clone(), Some(UserId::new()), StorefrontConfig::default());

    system.cart.add_item(kung_pao, 2, None).await.unwrap();
    system.cart.add_item(spring_roll, 1, None).await.unwrap();

    store.fail_next(StoreOp::OrderItemsInsert);
    let result = system.checkout.place_order(details()).await;

    let order_id = match result {
        Err(CheckoutError::PartialOrderFailure { order_id, .. }) => order_id,
        other => panic!("Expected PartialOrderFailure, got {other:?}"),
    };

    // The header exists with zero lines, exactly the state a
    // reconciliation job would look for.
    let orphan = system.orders.order(&order_id).await.unwrap();
    assert_eq!(orphan.order.total_amount, dec("88.50"));
    assert!(orphan.lines.is_empty());

    // The cart was deliberately not cleared.
    assert_eq!(system.cart.item_count().await.unwrap(), 3);

    system.shutdown().await.unwrap();
}

/// A duplicate order number is regenerated and retried exactly once.
#[tokio::test]
async fn order_number_conflict_is_retried_once() {
    let (store, kung_pao, _) = seeded_store();
    let user = UserId::new();
    let system = Storefront::new(store.clone(), Some(user), StorefrontConfig::default());
    system.cart.add_item(kung_pao, 1, None).await.unwrap();

    store.fail_next_with(
        StoreOp::OrderInsert,
        StoreError::Conflict("order_number".to_string()),
    );
    let order = system.checkout.place_order(details()).await.unwrap();
    assert_eq!(order.total_amount, dec("38.00"));

    let history = system.orders.orders_for(&user).await.unwrap();
    assert_eq!(history.len(), 1, "Exactly one order must exist");

    system.shutdown().await.unwrap();
}

/// Two conflicts in a row exhaust the single retry.
#[tokio::test]
async fn second_conflict_surfaces_collision() {
    let (store, kung_pao, _) = seeded_store();
    let system = Storefront::new(store.clone(), Some(UserId::new()), StorefrontConfig::default());
    system.cart.add_item(kung_pao, 1, None).await.unwrap();

    store.fail_next_with(
        StoreOp::OrderInsert,
        StoreError::Conflict("order_number".to_string()),
    );
    store.fail_next_with(
        StoreOp::OrderInsert,
        StoreError::Conflict("order_number".to_string()),
    );
    let result = system.checkout.place_order(details()).await;
    assert_eq!(result, Err(CheckoutError::OrderNumberCollision));

    // Validation failed remotely but the cart is untouched.
    assert_eq!(system.cart.item_count().await.unwrap(), 1);

    system.shutdown().await.unwrap();
}

/// A non-conflict header failure aborts with no side effects.
#[tokio::test]
async fn failed_header_insert_leaves_no_trace() {
    let (store, kung_pao, _) = seeded_store();
    let user = UserId::new();
    let system = Storefront::new(store.clone(), Some(user), StorefrontConfig::default());
    system.cart.add_item(kung_pao, 1, None).await.unwrap();

    store.fail_next(StoreOp::OrderInsert);
    let result = system.checkout.place_order(details()).await;
    assert!(matches!(result, Err(CheckoutError::OrderCreationFailed(_))));

    assert!(system.orders.orders_for(&user).await.unwrap().is_empty());
    assert_eq!(system.cart.item_count().await.unwrap(), 1);

    system.shutdown().await.unwrap();
}

/// A failed cart clear does not fail the order; the stale lines stay
/// consistent with the store and survive a refresh.
#[tokio::test]
async fn failed_clear_is_not_an_order_failure() {
    let (store, kung_pao, _) = seeded_store();
    let user = UserId::new();
    let system = Storefront::new(store.clone(), Some(user), StorefrontConfig::default());
    system.cart.add_item(kung_pao, 3, None).await.unwrap();

    store.fail_next(StoreOp::CartClear);
    let order = system.checkout.place_order(details()).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    // The clear never reached the store, so the lines are still remote
    // truth and a refresh keeps them.
    let stale = system.cart.refresh().await.unwrap();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].line.quantity, 3);

    system.shutdown().await.unwrap();
}

/// Order lines are priced from the cart's cached menu item, so a catalog
/// price change mid-checkout never leaks into the order.
#[tokio::test]
async fn snapshot_prices_ignore_later_catalog_changes() {
    let (store, _, _) = seeded_store();
    let mut dish = MenuItem::new("Dan Dan Noodles", "担担面", dec("22.00"));
    let dish_id = dish.id;
    store.seed_menu_item(dish.clone());

    let system = Storefront::new(store.clone(), Some(UserId::new()), StorefrontConfig::default());
    system.cart.add_item(dish_id, 2, None).await.unwrap();

    // The kitchen reprices the dish while the user is checking out.
    dish.price = dec("99.00");
    store.seed_menu_item(dish);

    let order = system.checkout.place_order(details()).await.unwrap();
    assert_eq!(order.total_amount, dec("44.00"));

    let placed = system.orders.order(&order.id).await.unwrap();
    assert_eq!(placed.lines[0].unit_price, dec("22.00"));
    assert_eq!(placed.lines[0].total_price, dec("44.00"));

    system.shutdown().await.unwrap();
}

use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use storefront::cart_actor::CartError;
use storefront::lifecycle::{Storefront, StorefrontConfig};
use storefront::model::{CartLineId, MenuItem, MenuItemId, UserId};
use storefront::store::{MemoryStore, StoreOp};

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

fn session(store: Arc<MemoryStore>, user: Option<UserId>) -> Storefront {
    Storefront::new(store, user, StorefrontConfig::default())
}

/// Adding the same menu item twice merges into one line, never two.
#[tokio::test]
async fn add_merges_into_existing_line() {
    let (store, kung_pao, _) = seeded_store();
    let system = session(store, Some(UserId::new()));

    system.cart.add_item(kung_pao, 1, None).await.unwrap();
    let merged = system.cart.add_item(kung_pao, 2, None).await.unwrap();

    assert_eq!(merged.line.quantity, 3);
    let entries = system.cart.entries().await.unwrap();
    assert_eq!(entries.len(), 1, "Merge must not create a second line");
    assert_eq!(system.cart.item_count().await.unwrap(), 3);

    system.shutdown().await.unwrap();
}

/// Quantity zero is rejected and the line keeps its previous quantity.
/// (Negative quantities are unrepresentable by construction.)
#[tokio::test]
async fn update_quantity_zero_is_invalid() {
    let (store, kung_pao, _) = seeded_store();
    let system = session(store, Some(UserId::new()));

    let entry = system.cart.add_item(kung_pao, 2, None).await.unwrap();
    let result = system.cart.update_quantity(entry.line.id, 0).await;
    assert_eq!(result, Err(CartError::InvalidQuantity(0)));

    let entries = system.cart.entries().await.unwrap();
    assert_eq!(entries[0].line.quantity, 2, "Quantity must be unchanged");

    system.shutdown().await.unwrap();
}

/// A line id outside the current identity's cart is `NotFound`.
#[tokio::test]
async fn update_quantity_unknown_line_is_not_found() {
    let (store, _, _) = seeded_store();
    let system = session(store, Some(UserId::new()));

    let bogus = CartLineId::new();
    let result = system.cart.update_quantity(bogus, 2).await;
    assert_eq!(result, Err(CartError::NotFound(bogus)));

    system.shutdown().await.unwrap();
}

/// Removing an absent line is a no-op success, so a double-click race never
/// surfaces a spurious failure.
#[tokio::test]
async fn remove_is_idempotent() {
    let (store, kung_pao, _) = seeded_store();
    let system = session(store, Some(UserId::new()));

    assert_eq!(system.cart.remove_item(CartLineId::new()).await, Ok(()));

    let entry = system.cart.add_item(kung_pao, 1, None).await.unwrap();
    assert_eq!(system.cart.remove_item(entry.line.id).await, Ok(()));
    assert_eq!(system.cart.remove_item(entry.line.id).await, Ok(()));
    assert!(system.cart.entries().await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

/// Without a bound identity every mutation fails locally; the store sees
/// no traffic at all.
#[tokio::test]
async fn mutations_require_identity() {
    let (store, kung_pao, _) = seeded_store();
    let system = session(store.clone(), None);

    let result = system.cart.add_item(kung_pao, 1, None).await;
    assert_eq!(result, Err(CartError::NotAuthenticated));
    assert_eq!(system.cart.clear().await, Err(CartError::NotAuthenticated));
    assert_eq!(store.writes(), 0, "No remote write may be attempted");

    system.shutdown().await.unwrap();
}

/// Unknown and unavailable items are rejected at add-time.
#[tokio::test]
async fn add_validates_the_menu_item() {
    let (store, _, _) = seeded_store();
    let mut sold_out = MenuItem::new("Mapo Tofu", "麻婆豆腐", dec("26.00"));
    sold_out.is_available = false;
    let sold_out_id = sold_out.id;
    store.seed_menu_item(sold_out);

    let system = session(store, Some(UserId::new()));

    let missing = MenuItemId::new();
    assert_eq!(
        system.cart.add_item(missing, 1, None).await,
        Err(CartError::UnknownMenuItem(missing))
    );
    assert_eq!(
        system.cart.add_item(sold_out_id, 1, None).await,
        Err(CartError::ItemUnavailable(sold_out_id))
    );

    system.shutdown().await.unwrap();
}

/// A failed remote write leaves the local cart untouched; the next attempt
/// starts from clean state.
#[tokio::test]
async fn persistence_failure_leaves_local_state_unchanged() {
    let (store, kung_pao, _) = seeded_store();
    let system = session(store.clone(), Some(UserId::new()));

    store.fail_next(StoreOp::CartInsert);
    let result = system.cart.add_item(kung_pao, 1, None).await;
    assert!(matches!(result, Err(CartError::Store(_))));
    assert!(system.cart.entries().await.unwrap().is_empty());

    // The fault is consumed; the retry succeeds normally.
    let entry = system.cart.add_item(kung_pao, 1, None).await.unwrap();
    assert_eq!(entry.line.quantity, 1);

    system.shutdown().await.unwrap();
}

/// Two rapid adds for a previously-absent item settle to a single line
/// with the summed quantity; the mailbox serializes them.
#[tokio::test]
async fn concurrent_adds_settle_to_one_line() {
    let (store, kung_pao, _) = seeded_store();
    let system = session(store, Some(UserId::new()));

    let (a, b) = (system.cart.clone(), system.cart.clone());
    let first = tokio::spawn(async move { a.add_item(kung_pao, 1, None).await });
    let second = tokio::spawn(async move { b.add_item(kung_pao, 1, None).await });
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let entries = system.cart.entries().await.unwrap();
    assert_eq!(entries.len(), 1, "Racing adds must not create two lines");
    assert_eq!(entries[0].line.quantity, 2);

    system.shutdown().await.unwrap();
}

/// A doubly-failed initial fetch degrades to an empty ready cart instead of
/// crashing; a later refresh reconciles against the store.
#[tokio::test]
async fn failed_initial_fetch_degrades_to_empty_cart() {
    let (store, kung_pao, _) = seeded_store();
    let user = UserId::new();

    // A line already exists remotely (e.g. from a previous session).
    let bootstrap = session(store.clone(), Some(user));
    bootstrap.cart.add_item(kung_pao, 2, None).await.unwrap();
    bootstrap.shutdown().await.unwrap();

    // The initial fetch is retried once, so both attempts must fail.
    store.fail_next(StoreOp::CartList);
    store.fail_next(StoreOp::CartList);
    let system = session(store, Some(user));

    assert!(system.cart.entries().await.unwrap().is_empty());
    assert_eq!(system.cart.item_count().await.unwrap(), 0);

    let reconciled = system.cart.refresh().await.unwrap();
    assert_eq!(reconciled.len(), 1);
    assert_eq!(reconciled[0].line.quantity, 2);

    system.shutdown().await.unwrap();
}

/// Clearing an already-empty cart succeeds.
#[tokio::test]
async fn clear_on_empty_cart_is_ok() {
    let (store, _, _) = seeded_store();
    let system = session(store, Some(UserId::new()));

    assert_eq!(system.cart.clear().await, Ok(()));

    system.shutdown().await.unwrap();
}

/// `total_price` follows the exact rounding contract.
#[tokio::test]
async fn total_price_matches_the_pricing_rules() {
    let (store, kung_pao, spring_roll) = seeded_store();
    let system = session(store, Some(UserId::new()));

    system.cart.add_item(kung_pao, 2, None).await.unwrap();
    system.cart.add_item(spring_roll, 1, None).await.unwrap();

    assert_eq!(system.cart.total_price().await.unwrap(), dec("88.50"));

    system.shutdown().await.unwrap();
}

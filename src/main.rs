//! Demo walkthrough of the storefront core against the in-memory store:
//! seed a small menu, sign in, fill a cart, and place an order.
//!
//! ```bash
//! RUST_LOG=info cargo run      # Compact logs
//! RUST_LOG=debug cargo run     # Full payloads
//! ```

use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use storefront::checkout::DeliveryDetails;
use storefront::lifecycle::{setup_tracing, Storefront, StorefrontConfig};
use storefront::model::{Category, MenuItem, UserId};
use storefront::store::MemoryStore;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting storefront demo");

    // Seed the catalog the way a real deployment would find it already
    // populated remotely.
    let store = Arc::new(MemoryStore::new());
    let mains = Category::new("Main Dishes", "主菜");
    store.seed_category(mains.clone());

    let mut kung_pao = MenuItem::new("Kung Pao Chicken", "宫保鸡丁", dec("38.00")?);
    kung_pao.category_id = Some(mains.id);
    kung_pao.is_featured = true;
    let kung_pao_id = kung_pao.id;
    store.seed_menu_item(kung_pao);

    let mut spring_roll = MenuItem::new("Spring Roll", "春卷", dec("12.50")?);
    spring_roll.category_id = Some(mains.id);
    let spring_roll_id = spring_roll.id;
    store.seed_menu_item(spring_roll);

    let user = UserId::new();
    let system = Storefront::new(store, Some(user), StorefrontConfig::default());

    let span = tracing::info_span!("browse");
    async {
        let featured = system
            .catalog
            .featured()
            .await
            .map_err(|e| e.to_string())?;
        info!(items = featured.len(), "Featured items loaded");
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("fill_cart");
    async {
        system
            .cart
            .add_item(kung_pao_id, 2, None)
            .await
            .map_err(|e| e.to_string())?;
        system
            .cart
            .add_item(spring_roll_id, 1, Some("Extra crispy".to_string()))
            .await
            .map_err(|e| e.to_string())?;

        let count = system.cart.item_count().await.map_err(|e| e.to_string())?;
        let total = system.cart.total_price().await.map_err(|e| e.to_string())?;
        info!(count, %total, "Cart ready");
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("checkout");
    let order = async {
        system
            .checkout
            .place_order(DeliveryDetails {
                delivery_address: "123 Main St".to_string(),
                phone: "555-0100".to_string(),
                special_instructions: None,
            })
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    info!(
        number = %order.order_number,
        total = %order.total_amount,
        status = %order.status,
        "Order placed, hand off to scan-to-pay"
    );

    let history = system
        .orders
        .orders_for(&user)
        .await
        .map_err(|e| e.to_string())?;
    info!(orders = history.len(), "Order history fetched");

    system.shutdown().await
}

fn dec(s: &str) -> Result<Decimal, String> {
    Decimal::from_str(s).map_err(|e| e.to_string())
}

use crate::cart_actor::CartActor;
use crate::catalog::MenuCatalog;
use crate::checkout::CheckoutService;
use crate::clients::CartClient;
use crate::history::OrderHistory;
use crate::model::UserId;
use crate::store::PersistentStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Tunables for a storefront session.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Capacity of the cart actor's mailbox; senders wait when it is full.
    pub mailbox_capacity: usize,
    /// Bounded deadline applied to every remote store call.
    pub store_timeout: Duration,
    /// Delivery fee policy. Always waived (zero) in scope.
    pub delivery_fee: Decimal,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 32,
            store_timeout: Duration::from_secs(5),
            delivery_fee: Decimal::ZERO,
        }
    }
}

/// The runtime orchestrator for one storefront session.
///
/// `Storefront` is responsible for:
/// - **Lifecycle**: starting the cart actor and shutting it down cleanly
/// - **Dependency wiring**: the store, cart client, and identity are passed
///   to each component explicitly at construction
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let system = Storefront::new(store, Some(user), StorefrontConfig::default());
///
/// system.cart.add_item(item_id, 1, None).await?;
/// let order = system.checkout.place_order(details).await?;
///
/// system.shutdown().await?;
/// ```
pub struct Storefront {
    /// Handle for cart reads and mutations.
    pub cart: CartClient,

    /// Order placement orchestrator.
    pub checkout: CheckoutService,

    /// Read-only menu catalog.
    pub catalog: MenuCatalog,

    /// Read-only order history.
    pub orders: OrderHistory,

    /// Cart actor task handle, awaited on shutdown.
    handle: tokio::task::JoinHandle<()>,
}

impl Storefront {
    /// Creates the session: spawns the cart actor for `identity` and wires
    /// the checkout, catalog, and history components around it.
    pub fn new(
        store: Arc<dyn PersistentStore>,
        identity: Option<UserId>,
        config: StorefrontConfig,
    ) -> Self {
        let (actor, cart) = CartActor::new(
            store.clone(),
            identity,
            config.mailbox_capacity,
            config.store_timeout,
        );
        let handle = tokio::spawn(actor.run());

        let checkout = CheckoutService::new(
            store.clone(),
            cart.clone(),
            identity,
            config.delivery_fee,
            config.store_timeout,
        );
        let catalog = MenuCatalog::new(store.clone(), config.store_timeout);
        let orders = OrderHistory::new(store, config.store_timeout);

        Self {
            cart,
            checkout,
            catalog,
            orders,
            handle,
        }
    }

    /// Gracefully shuts the session down: drops every client holding a
    /// mailbox sender (the checkout service keeps a cart clone), then waits
    /// for the actor to drain and exit.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down storefront...");

        drop(self.cart);
        drop(self.checkout);

        if let Err(e) = self.handle.await {
            error!("Cart actor task failed: {:?}", e);
            return Err(format!("Cart actor task failed: {e:?}"));
        }

        info!("Storefront shutdown complete");
        Ok(())
    }
}

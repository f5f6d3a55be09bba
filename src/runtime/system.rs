use crate::cart::CartSyncService;
use crate::checkout::CheckoutService;
use crate::orders::OrderStatusService;
use crate::store::{self, StoreClient};
use tracing::{error, info};

/// The main runtime orchestrator: spawns the store actor and wires the three
/// services onto it.
///
/// All services share one [`StoreClient`]; since the store actor processes
/// requests sequentially, the commits issued by checkout, status transitions,
/// and cart batches serialize naturally without any locking on this side.
///
/// # Example
///
/// ```ignore
/// let system = StorefrontSystem::new();
///
/// system.store.put_product(product).await?;
/// let order = system.checkout.place_order(Some(&user), draft).await?;
/// system.cart.clear(&user).await?;
///
/// system.shutdown().await?;
/// ```
pub struct StorefrontSystem {
    /// Direct handle to the store actor (catalog seeding, raw reads).
    pub store: StoreClient,

    /// Places orders with atomic stock decrement.
    pub checkout: CheckoutService,

    /// Moves orders through the status state machine.
    pub orders: OrderStatusService,

    /// Mirrors local carts into the store.
    pub cart: CartSyncService,

    /// Store actor task handle, awaited on shutdown.
    handle: tokio::task::JoinHandle<()>,
}

impl StorefrontSystem {
    /// Spawns the store actor and builds the service layer over it.
    ///
    /// A buffer of 32 pending requests matches the expected fan-in of a
    /// handful of concurrent sessions.
    pub fn new() -> Self {
        let (actor, store) = store::new(32);
        let handle = tokio::spawn(actor.run());

        let checkout = CheckoutService::new(store.clone());
        let orders = OrderStatusService::new(store.clone());
        let cart = CartSyncService::new(store.clone());

        Self {
            store,
            checkout,
            orders,
            cart,
            handle,
        }
    }

    /// Gracefully shuts the system down.
    ///
    /// Dropping every client closes the store's request channel; the actor
    /// drains what is queued and exits its loop. Returns an error if the
    /// actor task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.store);
        drop(self.checkout);
        drop(self.orders);
        drop(self.cart);

        if let Err(e) = self.handle.await {
            error!("Store actor task failed: {:?}", e);
            return Err(format!("Store actor task failed: {:?}", e));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

impl Default for StorefrontSystem {
    fn default() -> Self {
        Self::new()
    }
}

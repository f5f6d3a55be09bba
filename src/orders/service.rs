//! Order status transitions and the cancellation stock restore.

use crate::checkout::service::aggregate_quantities;
use crate::checkout::MAX_TRANSACTION_ATTEMPTS;
use crate::model::{Order, OrderId, OrderStatus};
use crate::orders::TransitionError;
use crate::store::{StockWrite, StoreClient, StoreError, TransitionCommit};
use tracing::{debug, info, instrument, warn};

/// Applies staff-driven status changes to orders.
///
/// Cancelling an order whose stock was decremented at checkout adds the
/// quantities back to inventory in the same atomic commit as the status
/// write. The `stock_adjusted`/`stock_restored` pair on the order is a
/// one-way latch: restoration happens at most once, and the latch flips only
/// when the commit succeeds, so a failed restore can be retried.
#[derive(Clone)]
pub struct OrderStatusService {
    store: StoreClient,
}

impl OrderStatusService {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Moves an order to `next`, recording `previous_status` and a server
    /// timestamp for auditability.
    ///
    /// Returns `Ok(None)` when the order does not exist (an explicit no-op,
    /// matching the store's behavior for vanished documents). Transitions
    /// outside the table fail with [`TransitionError::InvalidTransition`];
    /// re-applying the current status is allowed and inventory-neutral.
    #[instrument(skip(self), fields(order = %order_id, next = %next))]
    pub async fn transition(
        &self,
        order_id: &OrderId,
        next: OrderStatus,
    ) -> Result<Option<Order>, TransitionError> {
        for attempt in 1..=MAX_TRANSACTION_ATTEMPTS {
            let Some(order_doc) = self.store.get_order(order_id).await? else {
                debug!("Order does not exist, nothing to do");
                return Ok(None);
            };
            let order = &order_doc.value;
            let current = order.status;
            if !current.can_transition_to(next) {
                return Err(TransitionError::InvalidTransition {
                    from: current,
                    to: next,
                });
            }

            let should_restore = next == OrderStatus::Cancelled
                && order.stock_adjusted
                && !order.stock_restored;

            // Collect the restoration reads before the commit. Products
            // deleted from the catalog since purchase are skipped: their
            // stock is not recreated (best-effort restore).
            let mut stock = Vec::new();
            if should_restore && !order.items.is_empty() {
                for (product_id, quantity) in aggregate_quantities(&order.items) {
                    match self.store.get_product(&product_id).await? {
                        Some(doc) => stock.push(StockWrite {
                            product_id,
                            expected_version: doc.version,
                            new_stock: doc.value.stock + quantity,
                        }),
                        None => {
                            debug!(%product_id, "Product deleted since purchase, skipping restore");
                        }
                    }
                }
            }

            let commit = TransitionCommit {
                order_id: order_id.clone(),
                expected_version: order_doc.version,
                status: next,
                previous_status: current,
                stock_adjusted: if should_restore {
                    false
                } else {
                    order.stock_adjusted
                },
                stock_restored: should_restore || order.stock_restored,
                stock,
            };

            match self.store.commit_transition(commit).await {
                Ok(updated) => {
                    info!(
                        from = %current,
                        restored = should_restore,
                        "Order status updated"
                    );
                    return Ok(Some(updated));
                }
                Err(StoreError::Conflict) => {
                    debug!(attempt, "Transition lost a version race, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!("Transition retry budget exhausted");
        Err(TransitionError::Conflict)
    }
}

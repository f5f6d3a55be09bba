//! The order-placement transaction.

use crate::checkout::CheckoutError;
use crate::model::{Order, OrderDraft, OrderItem, ProductId, UserId};
use crate::store::{CheckoutCommit, StockWrite, StoreClient, StoreError};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// How many times a transaction re-runs its read phase after losing a
/// version race before giving up.
pub const MAX_TRANSACTION_ATTEMPTS: usize = 5;

/// Sums requested quantities per distinct product.
///
/// A well-formed cart never holds duplicate product rows, but checkout and
/// restoration both aggregate defensively so a malformed draft cannot split
/// one product's demand across lines and dodge validation.
pub(crate) fn aggregate_quantities(items: &[OrderItem]) -> BTreeMap<ProductId, u32> {
    let mut by_product = BTreeMap::new();
    for item in items {
        *by_product.entry(item.product_id.clone()).or_insert(0) += item.quantity.max(1);
    }
    by_product
}

/// Places orders: validates stock, decrements inventory, and persists the
/// order record in one atomic store commit.
#[derive(Clone)]
pub struct CheckoutService {
    store: StoreClient,
}

impl CheckoutService {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Atomically validates and decrements stock for every line of `draft`
    /// and creates the order, marked as having had stock adjusted.
    ///
    /// Structured as explicit phases per transaction attempt: collect all
    /// reads, validate, then submit a single conditional commit. A version
    /// conflict re-runs the whole attempt; `ProductNotFound` and
    /// `InsufficientStock` are terminal and leave no side effect.
    ///
    /// With no signed-in user this refuses to act entirely.
    #[instrument(skip(self, draft), fields(items = draft.items.len()))]
    pub async fn place_order(
        &self,
        user: Option<&UserId>,
        mut draft: OrderDraft,
    ) -> Result<Order, CheckoutError> {
        let Some(user) = user else {
            return Err(CheckoutError::NotSignedIn);
        };
        if draft.items.is_empty() {
            return Err(CheckoutError::EmptyOrder);
        }
        draft.user_id = user.clone();

        let requested = aggregate_quantities(&draft.items);

        for attempt in 1..=MAX_TRANSACTION_ATTEMPTS {
            // READ phase: current stock and version for every distinct product.
            let mut read = BTreeMap::new();
            for product_id in requested.keys() {
                match self.store.get_product(product_id).await? {
                    Some(doc) => {
                        read.insert(product_id.clone(), doc);
                    }
                    None => return Err(CheckoutError::ProductNotFound(product_id.clone())),
                }
            }

            // VALIDATE phase: every line must be satisfiable before any write.
            let mut stock = Vec::with_capacity(requested.len());
            for (product_id, quantity) in &requested {
                let doc = &read[product_id];
                if doc.value.stock < *quantity {
                    return Err(CheckoutError::InsufficientStock {
                        product_id: product_id.clone(),
                        requested: *quantity,
                        available: doc.value.stock,
                    });
                }
                stock.push(StockWrite {
                    product_id: product_id.clone(),
                    expected_version: doc.version,
                    new_stock: doc.value.stock - quantity,
                });
            }

            // WRITE phase: one conditional commit for all decrements + the order.
            match self
                .store
                .commit_checkout(CheckoutCommit {
                    stock,
                    draft: draft.clone(),
                })
                .await
            {
                Ok(order) => {
                    info!(order_id = %order.id, user = %user, total = order.total, "Order placed");
                    return Ok(order);
                }
                Err(StoreError::Conflict) => {
                    debug!(attempt, "Checkout lost a version race, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(user = %user, "Checkout retry budget exhausted");
        Err(CheckoutError::Conflict)
    }
}

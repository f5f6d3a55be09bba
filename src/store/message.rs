//! Message types for communication with the store actor.

use crate::model::{CartLine, Order, OrderDraft, OrderId, OrderStatus, Product, ProductId, UserId};
use crate::store::StoreError;
use tokio::sync::{oneshot, watch};

/// One-shot response channel used by store requests.
pub type Response<T> = oneshot::Sender<T>;

/// A document together with the version counter the store keeps for it.
///
/// Versions are the optimistic-concurrency handle: a commit names the
/// versions it read, and the store rejects the whole commit if any of them
/// has moved on.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

/// A conditional stock write: "set this product's stock to `new_stock`,
/// provided the document is still at `expected_version`".
#[derive(Debug, Clone, PartialEq)]
pub struct StockWrite {
    pub product_id: ProductId,
    pub expected_version: u64,
    pub new_stock: u32,
}

/// All-or-nothing checkout commit: decrement stock for every line and create
/// the order document in one step. The store assigns the order id, the
/// creation timestamp, and sets `stock_adjusted = true`.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutCommit {
    pub stock: Vec<StockWrite>,
    pub draft: OrderDraft,
}

/// All-or-nothing order status transition, optionally restoring stock.
///
/// `stock` carries the restoration writes (empty for plain status moves);
/// the latch flags are computed by the caller from the same read snapshot
/// that `expected_version` pins.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionCommit {
    pub order_id: OrderId,
    pub expected_version: u64,
    pub status: OrderStatus,
    pub previous_status: OrderStatus,
    pub stock_adjusted: bool,
    pub stock_restored: bool,
    pub stock: Vec<StockWrite>,
}

/// One operation inside an atomic cart batch.
#[derive(Debug, Clone, PartialEq)]
pub enum CartWrite {
    /// Create or replace the line for a product; the store stamps
    /// `updated_at`.
    Upsert { product_id: ProductId, quantity: u32 },
    /// Remove the line for a product.
    Delete(ProductId),
    /// Clear the user's legacy single-document cart array.
    ClearLegacy,
    /// Remove every line in the user's cart collection.
    ClearAll,
}

/// Requests processed by [`StoreActor`](crate::store::StoreActor).
///
/// Reads respond with plain payloads; commits respond with
/// `Result<_, StoreError>` so version conflicts surface to the caller.
#[derive(Debug)]
pub enum StoreRequest {
    GetProduct {
        id: ProductId,
        respond_to: Response<Option<Versioned<Product>>>,
    },
    PutProduct {
        product: Product,
        respond_to: Response<()>,
    },
    RemoveProduct {
        id: ProductId,
        respond_to: Response<bool>,
    },
    GetOrder {
        id: OrderId,
        respond_to: Response<Option<Versioned<Order>>>,
    },
    CommitCheckout {
        commit: CheckoutCommit,
        respond_to: Response<Result<Order, StoreError>>,
    },
    CommitTransition {
        commit: TransitionCommit,
        respond_to: Response<Result<Order, StoreError>>,
    },
    CartLines {
        user: UserId,
        respond_to: Response<Vec<CartLine>>,
    },
    LegacyCart {
        user: UserId,
        respond_to: Response<Vec<(ProductId, u32)>>,
    },
    PutLegacyCart {
        user: UserId,
        lines: Vec<(ProductId, u32)>,
        respond_to: Response<()>,
    },
    ApplyCartBatch {
        user: UserId,
        writes: Vec<CartWrite>,
        respond_to: Response<()>,
    },
    SubscribeCart {
        user: UserId,
        respond_to: Response<watch::Receiver<Vec<CartLine>>>,
    },
}

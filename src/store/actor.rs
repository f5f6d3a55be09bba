//! # Store Actor
//!
//! In-memory stand-in for the hosted document store, with the same contract
//! the rest of the crate is written against: versioned per-document reads,
//! all-or-nothing commits with version preconditions, atomic cart batches,
//! and live cart snapshots pushed over `watch` channels.
//!
//! **Concurrency model**: the actor owns all collections and processes one
//! message at a time, so every commit is serialized with respect to the
//! documents it touches without any locking. Optimistic concurrency happens
//! *between* commits: a commit names the document versions its caller read,
//! and any mismatch rejects the whole commit with [`StoreError::Conflict`].

use crate::model::{CartLine, Order, Timestamp, UserId};
use crate::model::{OrderId, Product, ProductId};
use crate::store::client::StoreClient;
use crate::store::message::{
    CartWrite, CheckoutCommit, StoreRequest, TransitionCommit, Versioned,
};
use crate::store::StoreError;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// The document store, run as a single Tokio task.
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    products: HashMap<ProductId, Versioned<Product>>,
    orders: HashMap<OrderId, Versioned<Order>>,
    carts: HashMap<UserId, BTreeMap<ProductId, CartLine>>,
    legacy_carts: HashMap<UserId, Vec<(ProductId, u32)>>,
    cart_watch: HashMap<UserId, watch::Sender<Vec<CartLine>>>,
    clock: u64,
    next_order_id: u32,
}

impl StoreActor {
    /// Creates the store actor and its client.
    pub fn new(buffer_size: usize) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            products: HashMap::new(),
            orders: HashMap::new(),
            carts: HashMap::new(),
            legacy_carts: HashMap::new(),
            cart_watch: HashMap::new(),
            clock: 0,
            next_order_id: 1,
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the store's event loop until every client is dropped.
    pub async fn run(mut self) {
        info!("Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::GetProduct { id, respond_to } => {
                    let doc = self.products.get(&id).cloned();
                    debug!(%id, found = doc.is_some(), "GetProduct");
                    let _ = respond_to.send(doc);
                }
                StoreRequest::PutProduct {
                    product,
                    respond_to,
                } => {
                    debug!(id = %product.id, "PutProduct");
                    self.put_product(product);
                    let _ = respond_to.send(());
                }
                StoreRequest::RemoveProduct { id, respond_to } => {
                    let removed = self.products.remove(&id).is_some();
                    debug!(%id, removed, "RemoveProduct");
                    let _ = respond_to.send(removed);
                }
                StoreRequest::GetOrder { id, respond_to } => {
                    let doc = self.orders.get(&id).cloned();
                    debug!(%id, found = doc.is_some(), "GetOrder");
                    let _ = respond_to.send(doc);
                }
                StoreRequest::CommitCheckout { commit, respond_to } => {
                    let result = self.commit_checkout(commit);
                    let _ = respond_to.send(result);
                }
                StoreRequest::CommitTransition { commit, respond_to } => {
                    let result = self.commit_transition(commit);
                    let _ = respond_to.send(result);
                }
                StoreRequest::CartLines { user, respond_to } => {
                    let _ = respond_to.send(self.cart_snapshot(&user));
                }
                StoreRequest::LegacyCart { user, respond_to } => {
                    let lines = self.legacy_carts.get(&user).cloned().unwrap_or_default();
                    let _ = respond_to.send(lines);
                }
                StoreRequest::PutLegacyCart {
                    user,
                    lines,
                    respond_to,
                } => {
                    debug!(%user, count = lines.len(), "PutLegacyCart");
                    self.legacy_carts.insert(user, lines);
                    let _ = respond_to.send(());
                }
                StoreRequest::ApplyCartBatch {
                    user,
                    writes,
                    respond_to,
                } => {
                    debug!(%user, writes = writes.len(), "ApplyCartBatch");
                    self.apply_cart_batch(&user, writes);
                    let _ = respond_to.send(());
                }
                StoreRequest::SubscribeCart { user, respond_to } => {
                    debug!(%user, "SubscribeCart");
                    let receiver = self.subscribe_cart(&user);
                    let _ = respond_to.send(receiver);
                }
            }
        }

        info!(
            products = self.products.len(),
            orders = self.orders.len(),
            "Store shutdown"
        );
    }

    fn now(&mut self) -> Timestamp {
        self.clock += 1;
        Timestamp(self.clock)
    }

    fn put_product(&mut self, product: Product) {
        let version = self
            .products
            .get(&product.id)
            .map(|doc| doc.version + 1)
            .unwrap_or(1);
        self.products.insert(
            product.id.clone(),
            Versioned {
                value: product,
                version,
            },
        );
    }

    /// Verifies every version precondition in `commit`, then applies the
    /// stock decrements and creates the order. Reads happened on the caller's
    /// side before this message; the commit itself is all-or-nothing.
    fn commit_checkout(&mut self, commit: CheckoutCommit) -> Result<Order, StoreError> {
        for write in &commit.stock {
            match self.products.get(&write.product_id) {
                Some(doc) if doc.version == write.expected_version => {}
                _ => {
                    warn!(id = %write.product_id, "Checkout commit conflict");
                    return Err(StoreError::Conflict);
                }
            }
        }

        for write in &commit.stock {
            let doc = self
                .products
                .get_mut(&write.product_id)
                .ok_or(StoreError::Conflict)?;
            doc.value.stock = write.new_stock;
            doc.version += 1;
        }

        let id = OrderId(format!("order_{}", self.next_order_id));
        self.next_order_id += 1;
        let created_at = self.now();
        let draft = commit.draft;
        let order = Order {
            id: id.clone(),
            user_id: draft.user_id,
            date: draft.date,
            status: draft.status,
            payment_status: draft.payment_status,
            payment_method: draft.payment_method,
            paid_at: draft.paid_at,
            total: draft.total,
            items: draft.items,
            stock_adjusted: true,
            stock_restored: false,
            previous_status: None,
            status_updated_at: None,
            created_at,
        };
        self.orders.insert(
            id.clone(),
            Versioned {
                value: order.clone(),
                version: 1,
            },
        );
        info!(%id, lines = commit.stock.len(), "Checkout committed");
        Ok(order)
    }

    /// Applies a status transition (and any stock restoration) if the order
    /// and every touched product are still at the versions the caller read.
    fn commit_transition(&mut self, commit: TransitionCommit) -> Result<Order, StoreError> {
        match self.orders.get(&commit.order_id) {
            Some(doc) if doc.version == commit.expected_version => {}
            _ => {
                warn!(id = %commit.order_id, "Transition commit conflict");
                return Err(StoreError::Conflict);
            }
        }
        for write in &commit.stock {
            match self.products.get(&write.product_id) {
                Some(doc) if doc.version == write.expected_version => {}
                _ => {
                    warn!(id = %write.product_id, "Transition commit conflict");
                    return Err(StoreError::Conflict);
                }
            }
        }

        for write in &commit.stock {
            let doc = self
                .products
                .get_mut(&write.product_id)
                .ok_or(StoreError::Conflict)?;
            doc.value.stock = write.new_stock;
            doc.version += 1;
        }

        let updated_at = self.now();
        let doc = self
            .orders
            .get_mut(&commit.order_id)
            .ok_or(StoreError::Conflict)?;
        doc.value.status = commit.status;
        doc.value.previous_status = Some(commit.previous_status);
        doc.value.status_updated_at = Some(updated_at);
        doc.value.stock_adjusted = commit.stock_adjusted;
        doc.value.stock_restored = commit.stock_restored;
        doc.version += 1;
        info!(
            id = %commit.order_id,
            status = %commit.status,
            restored = commit.stock.len(),
            "Transition committed"
        );
        Ok(doc.value.clone())
    }

    fn apply_cart_batch(&mut self, user: &UserId, writes: Vec<CartWrite>) {
        let stamped_at = self.now();
        let cart = self.carts.entry(user.clone()).or_default();
        for write in writes {
            match write {
                CartWrite::Upsert {
                    product_id,
                    quantity,
                } => {
                    cart.insert(
                        product_id.clone(),
                        CartLine {
                            product_id,
                            quantity: quantity.max(1),
                            updated_at: stamped_at,
                        },
                    );
                }
                CartWrite::Delete(product_id) => {
                    cart.remove(&product_id);
                }
                CartWrite::ClearLegacy => {
                    self.legacy_carts.remove(user);
                }
                CartWrite::ClearAll => {
                    cart.clear();
                }
            }
        }
        self.notify_cart(user);
    }

    /// Full snapshot of a user's cart, sorted by product id (the `BTreeMap`
    /// keeps iteration order stable).
    fn cart_snapshot(&self, user: &UserId) -> Vec<CartLine> {
        self.carts
            .get(user)
            .map(|cart| cart.values().cloned().collect())
            .unwrap_or_default()
    }

    fn subscribe_cart(&mut self, user: &UserId) -> watch::Receiver<Vec<CartLine>> {
        let snapshot = self.cart_snapshot(user);
        self.cart_watch
            .entry(user.clone())
            .or_insert_with(|| watch::channel(snapshot).0)
            .subscribe()
    }

    fn notify_cart(&mut self, user: &UserId) {
        let Some(sender) = self.cart_watch.get(user) else {
            return;
        };
        // Every receiver is gone; drop the sender. The next subscribe
        // starts a fresh channel seeded with the current snapshot.
        if sender.receiver_count() == 0 {
            self.cart_watch.remove(user);
            return;
        }
        sender.send_replace(self.cart_snapshot(user));
    }
}

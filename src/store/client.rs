//! # Store Client
//!
//! Cheap-to-clone handle for talking to the [`StoreActor`](crate::store::StoreActor).
//! Every method sends one request over the mpsc channel and awaits the
//! oneshot reply; channel failures map to [`StoreError::Closed`] /
//! [`StoreError::Dropped`].

use crate::model::{CartLine, Order, OrderId, Product, ProductId, UserId};
use crate::store::message::{
    CheckoutCommit, StoreRequest, TransitionCommit, Versioned,
};
use crate::store::{CartWrite, StoreError};
use tokio::sync::{oneshot, watch};

/// Client side of the store actor.
#[derive(Clone)]
pub struct StoreClient {
    sender: tokio::sync::mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: tokio::sync::mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)
    }

    /// Fetches a product document with its current version.
    pub async fn get_product(
        &self,
        id: &ProductId,
    ) -> Result<Option<Versioned<Product>>, StoreError> {
        let id = id.clone();
        self.request(|respond_to| StoreRequest::GetProduct { id, respond_to })
            .await
    }

    /// Creates or replaces a product document (the external catalog path).
    pub async fn put_product(&self, product: Product) -> Result<(), StoreError> {
        self.request(|respond_to| StoreRequest::PutProduct {
            product,
            respond_to,
        })
        .await
    }

    /// Deletes a product document; returns whether it existed.
    pub async fn remove_product(&self, id: &ProductId) -> Result<bool, StoreError> {
        let id = id.clone();
        self.request(|respond_to| StoreRequest::RemoveProduct { id, respond_to })
            .await
    }

    pub async fn get_order(&self, id: &OrderId) -> Result<Option<Versioned<Order>>, StoreError> {
        let id = id.clone();
        self.request(|respond_to| StoreRequest::GetOrder { id, respond_to })
            .await
    }

    /// Atomically decrements stock and creates the order, or fails with
    /// [`StoreError::Conflict`] if any read version has moved.
    pub async fn commit_checkout(&self, commit: CheckoutCommit) -> Result<Order, StoreError> {
        self.request(|respond_to| StoreRequest::CommitCheckout { commit, respond_to })
            .await?
    }

    /// Atomically applies a status transition (plus any stock restoration).
    pub async fn commit_transition(&self, commit: TransitionCommit) -> Result<Order, StoreError> {
        self.request(|respond_to| StoreRequest::CommitTransition { commit, respond_to })
            .await?
    }

    /// Current cart lines for a user, sorted by product id.
    pub async fn cart_lines(&self, user: &UserId) -> Result<Vec<CartLine>, StoreError> {
        let user = user.clone();
        self.request(|respond_to| StoreRequest::CartLines { user, respond_to })
            .await
    }

    /// The user's legacy single-document cart array, if any.
    pub async fn legacy_cart(&self, user: &UserId) -> Result<Vec<(ProductId, u32)>, StoreError> {
        let user = user.clone();
        self.request(|respond_to| StoreRequest::LegacyCart { user, respond_to })
            .await
    }

    /// Seeds the legacy cart array (the old-format write path).
    pub async fn put_legacy_cart(
        &self,
        user: &UserId,
        lines: Vec<(ProductId, u32)>,
    ) -> Result<(), StoreError> {
        let user = user.clone();
        self.request(|respond_to| StoreRequest::PutLegacyCart {
            user,
            lines,
            respond_to,
        })
        .await
    }

    /// Commits a batch of cart writes as one atomic operation.
    pub async fn apply_cart_batch(
        &self,
        user: &UserId,
        writes: Vec<CartWrite>,
    ) -> Result<(), StoreError> {
        let user = user.clone();
        self.request(|respond_to| StoreRequest::ApplyCartBatch {
            user,
            writes,
            respond_to,
        })
        .await
    }

    /// Live query over a user's cart: the receiver holds the latest full
    /// snapshot and is updated on every change. Dropping it unsubscribes.
    pub async fn subscribe_cart(
        &self,
        user: &UserId,
    ) -> Result<watch::Receiver<Vec<CartLine>>, StoreError> {
        let user = user.clone();
        self.request(|respond_to| StoreRequest::SubscribeCart { user, respond_to })
            .await
    }
}

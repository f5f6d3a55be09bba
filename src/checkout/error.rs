//! Error types for the checkout transaction.

use crate::model::ProductId;
use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur while placing an order.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    /// No authenticated user; the caller must prompt sign-in and retry.
    #[error("not signed in")]
    NotSignedIn,

    /// The draft contains no items.
    #[error("order has no items")]
    EmptyOrder,

    /// A referenced product vanished between cart population and checkout.
    /// Terminal; surfaced as "please refresh your cart".
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Requested quantity exceeds available stock at commit time. Terminal;
    /// no stock was mutated.
    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The retry budget was exhausted by concurrent commits. Surfaced as a
    /// generic "please try again".
    #[error("checkout conflicted with concurrent writes, giving up")]
    Conflict,

    /// The store is unreachable.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

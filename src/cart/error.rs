//! Error types for cart reconciliation.

use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur while reconciling a cart.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// No authenticated user; the cart cannot be persisted for an anonymous
    /// identity.
    #[error("not signed in")]
    NotSignedIn,

    /// The store is unreachable.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

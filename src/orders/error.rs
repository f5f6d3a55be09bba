//! Error types for order status transitions.

use crate::model::OrderStatus;
use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur while moving an order through its lifecycle.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    /// The requested move is not in the transition table.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The retry budget was exhausted by concurrent commits.
    #[error("status transition conflicted with concurrent writes, giving up")]
    Conflict,

    /// The store is unreachable.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

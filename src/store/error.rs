//! Error type for store operations.
//!
//! One enum for the whole store, in the same spirit as the per-actor error
//! design used elsewhere in the crate: transport failures and commit
//! conflicts share a type so callers can match on a single error.

/// Errors that can occur while talking to the store actor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store actor's channel is closed (system shut down).
    #[error("store closed")]
    Closed,

    /// The store actor dropped the response channel.
    #[error("store dropped response channel")]
    Dropped,

    /// A commit's version preconditions no longer hold: a document read
    /// during the transaction was written (or deleted) by a concurrent
    /// commit. The caller re-runs its read phase and tries again.
    #[error("commit conflicted with a concurrent write")]
    Conflict,
}

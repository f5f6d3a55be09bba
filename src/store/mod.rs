//! # Document Store
//!
//! The hosted document database the storefront is built against, modeled as
//! a single actor that owns every collection (products, orders, per-user
//! cart lines, legacy cart arrays) plus the live-query machinery.
//!
//! ## Transaction contract
//!
//! The store enforces the two rules the rest of the crate is structured
//! around:
//!
//! 1. **All reads before any writes.** Callers read versioned documents
//!    first, validate, then submit one commit message carrying the versions
//!    they read. There is no way to interleave a read into a commit.
//! 2. **Optimistic concurrency.** A commit whose version preconditions no
//!    longer hold is rejected wholesale with [`StoreError::Conflict`]; the
//!    caller re-reads and retries with a bounded budget. Committed
//!    transactions are serialized by the actor's sequential message loop.
//!
//! Cart batches ([`CartWrite`]) are atomic but unconditional, matching the
//! batched-write primitive (no read validation).

pub mod actor;
pub mod client;
pub mod error;
pub mod message;

pub use actor::StoreActor;
pub use client::StoreClient;
pub use error::StoreError;
pub use message::{CartWrite, CheckoutCommit, StockWrite, StoreRequest, TransitionCommit, Versioned};

/// Creates a store actor and its client.
pub fn new(buffer_size: usize) -> (StoreActor, StoreClient) {
    StoreActor::new(buffer_size)
}

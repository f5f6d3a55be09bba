//! # Cart Reconciliation
//!
//! The local cart is authoritative while the user shops; the store holds a
//! mirrored per-line collection that follows it. [`CartSession`] owns the
//! local state and the once-per-session hydration/migration guards,
//! [`CartSyncService`] computes minimal diffs and pushes them as atomic
//! batches, and [`spawn_sync_worker`] debounces bursts of edits into single
//! round-trips.
//!
//! Concurrent sessions for the same user are resolved last-batch-wins per
//! line; there is no cross-device merge.

pub mod error;
pub mod session;
pub mod sync;

pub use error::CartError;
pub use session::CartSession;
pub use sync::{diff, spawn_sync_worker, CartSyncService, SyncOutcome, SYNC_DEBOUNCE};

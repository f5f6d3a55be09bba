//! # Order Lifecycle
//!
//! The status state machine (`Pending -> Shipped -> Delivered`, with
//! `Pending -> Cancelled`) and the service that applies transitions.
//!
//! Cancellation is the one transition with an inventory side effect: if the
//! order's stock was decremented at checkout and never restored, the
//! cancelled quantities are added back atomically with the status write.
//! The restore is best-effort per product: lines whose product has since
//! been deleted from the catalog are silently skipped.

pub mod error;
pub mod service;
pub mod status;

pub use error::TransitionError;
pub use service::OrderStatusService;

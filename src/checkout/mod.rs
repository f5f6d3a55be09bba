//! # Checkout
//!
//! The transactional order-placement flow: given a signed-in user and an
//! order draft built from the local cart, atomically verify stock for every
//! line, decrement inventory, and persist the order document.
//!
//! Failure semantics: `ProductNotFound` and `InsufficientStock` are terminal
//! and leave the store untouched; version conflicts with concurrent commits
//! are retried up to [`MAX_TRANSACTION_ATTEMPTS`] times before surfacing as
//! [`CheckoutError::Conflict`]. Either the whole commit lands or none of it
//! does.

pub mod error;
pub mod service;

pub use error::CheckoutError;
pub use service::{CheckoutService, MAX_TRANSACTION_ATTEMPTS};

//! # Runtime
//!
//! Wires the whole system together: [`StorefrontSystem`] spawns the store
//! actor, builds the checkout, order-status, and cart services over it, and
//! owns graceful shutdown. [`setup_tracing`] configures logging.

pub mod system;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use system::StorefrontSystem;

//! # Storefront Core
//!
//! > **Checkout, inventory consistency, and cart reconciliation over a
//! > single-writer store actor.**
//!
//! The hard problem in a small storefront is not serving pages, it is
//! keeping inventory honest: two buyers racing for the last unit must not
//! both win, and a cancelled order must give its stock back exactly once.
//! This crate solves that with one store actor that owns all documents and
//! processes requests sequentially, plus optimistic version checks so
//! multi-step operations stay atomic without locks.
//!
//! ## Concurrency Model
//!
//! All state lives inside [`store::StoreActor`], which runs in its own Tokio
//! task and handles one message at a time. Services never mutate documents
//! directly; they read versioned snapshots, decide, and submit an
//! all-or-nothing commit naming the versions they read. If anything moved in
//! between, the store rejects the whole commit and the service retries with
//! fresh reads (bounded by [`checkout::MAX_TRANSACTION_ATTEMPTS`]).
//!
//! ## Module Tour
//!
//! - [`store`]: the document store actor, its versioned commits, and the
//!   cheap-clone [`StoreClient`](store::StoreClient).
//! - [`checkout`]: the read/validate/write checkout transaction with
//!   atomic stock decrement.
//! - [`orders`]: the status state machine and the cancellation stock
//!   restore, latched so it runs at most once per order.
//! - [`cart`]: local cart state, minimal-diff reconciliation, legacy
//!   migration, and the debounced sync worker.
//! - [`model`]: plain document types (products, orders, cart lines).
//! - [`pricing`]: promotion math shared by cart display and checkout.
//! - [`identity`]: the authenticated-user seam.
//! - [`runtime`]: [`StorefrontSystem`](runtime::StorefrontSystem) wiring
//!   and tracing setup.
//!
//! ## Quick Start
//!
//! ```ignore
//! runtime::setup_tracing();
//! let system = runtime::StorefrontSystem::new();
//!
//! system.store.put_product(product).await?;
//! let draft = OrderDraft::from_cart(user.clone(), session.items(), PaymentMethod::Qr, date);
//! let order = system.checkout.place_order(Some(&user), draft).await?;
//! system.cart.clear(&user).await?;
//!
//! system.shutdown().await?;
//! ```

pub mod cart;
pub mod checkout;
pub mod identity;
pub mod model;
pub mod orders;
pub mod pricing;
pub mod runtime;
pub mod store;

//! Pure domain data types shared by the store, checkout, and cart layers.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::*;
pub use order::*;
pub use product::*;

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for users, supplied by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A server-assigned timestamp, resolved by the store at commit time.
///
/// Modeled as a logical clock: the store bumps it on every mutation, so
/// timestamps are totally ordered and deterministic in tests.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

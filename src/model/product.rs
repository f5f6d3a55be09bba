//! Catalog product documents.
//!
//! Products are created and edited by the external catalog back office; this
//! crate only ever mutates the `stock` field, and only through the checkout
//! transaction and the cancellation restore path.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for products (document id in the catalog collection).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product document.
///
/// `stock` is the inventory ledger entry for this product and never goes
/// negative: the checkout transaction refuses to commit a decrement below
/// zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    /// Percent discount applied to `price`, clamped to 0-100.
    pub promotion_percent: f64,
    pub category: String,
    pub image: String,
    pub description: String,
    pub stock: u32,
    pub rating: f64,
    pub is_new_arrival: bool,
    pub colors: Vec<String>,
}

impl Product {
    /// Creates a product with the fields the core cares about; the remaining
    /// catalog fields default to empty.
    pub fn new(id: ProductId, name: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            promotion_percent: 0.0,
            category: String::new(),
            image: String::new(),
            description: String::new(),
            stock,
            rating: 0.0,
            is_new_arrival: false,
            colors: Vec::new(),
        }
    }

    pub fn with_promotion(mut self, percent: f64) -> Self {
        self.promotion_percent = percent;
        self
    }
}

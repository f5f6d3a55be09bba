//! Cart records: the server-persisted per-product line and the client-held
//! cart item.

use crate::model::{Product, ProductId, Timestamp};
use serde::{Deserialize, Serialize};

/// One server-persisted cart line, keyed by product id under a per-user
/// collection. At most one line per product per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    /// Always >= 1; a zero-quantity line is deleted instead.
    pub quantity: u32,
    pub updated_at: Timestamp,
}

/// A client-held cart entry: the full product merged with a quantity.
///
/// The quantity is clamped to `[1, product.stock]` at mutation time by
/// [`CartSession`](crate::cart::CartSession); an item is removed entirely
/// rather than allowed to reach zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalCartItem {
    pub product: Product,
    pub quantity: u32,
}

impl LocalCartItem {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }
}

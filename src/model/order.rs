//! Order documents and the draft payload consumed by checkout.

use crate::model::{LocalCartItem, ProductId, Timestamp, UserId};
use crate::pricing::{cart_totals, discounted_unit_price, normalize_promotion_percent};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for orders, assigned by the store on commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of an order. The allowed transitions live in
/// [`crate::orders`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Qr,
    Bank,
}

/// Immutable snapshot of one purchased line.
///
/// `price` is the unit price after discount at purchase time; later catalog
/// edits must not change historical orders, so the name, image, and pricing
/// are copied rather than referenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
    pub original_price: f64,
    pub promotion_percent: f64,
    pub quantity: u32,
    pub image: String,
}

/// An order document.
///
/// `stock_adjusted`/`stock_restored` form a one-way latch: stock is
/// decremented exactly once at checkout and restored at most once on
/// cancellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Caller-supplied readable date (ISO string in the UI).
    pub date: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub paid_at: Option<String>,
    pub total: f64,
    pub items: Vec<OrderItem>,
    pub stock_adjusted: bool,
    pub stock_restored: bool,
    pub previous_status: Option<OrderStatus>,
    pub status_updated_at: Option<Timestamp>,
    /// Server-assigned creation timestamp, for reliable sorting.
    pub created_at: Timestamp,
}

/// The caller-supplied part of an order, handed to
/// [`CheckoutService::place_order`](crate::checkout::CheckoutService::place_order).
/// The store fills in the id, creation timestamp, and latch flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub user_id: UserId,
    pub date: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub paid_at: Option<String>,
    pub total: f64,
    pub items: Vec<OrderItem>,
}

impl OrderDraft {
    /// Builds a paid, pending draft from the local cart, snapshotting unit
    /// prices after promotion.
    pub fn from_cart(
        user_id: UserId,
        cart: &[LocalCartItem],
        method: PaymentMethod,
        date: impl Into<String>,
    ) -> Self {
        let date = date.into();
        let items: Vec<OrderItem> = cart
            .iter()
            .map(|line| {
                let p = &line.product;
                OrderItem {
                    product_id: p.id.clone(),
                    name: p.name.clone(),
                    price: discounted_unit_price(p.price, p.promotion_percent),
                    original_price: p.price,
                    promotion_percent: normalize_promotion_percent(p.promotion_percent),
                    quantity: line.quantity,
                    image: p.image.clone(),
                }
            })
            .collect();
        let total = cart_totals(cart.iter().map(|line| {
            (
                line.product.price,
                line.product.promotion_percent,
                line.quantity,
            )
        }))
        .discounted_subtotal;

        Self {
            user_id,
            date: date.clone(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Paid,
            payment_method: method,
            paid_at: Some(date),
            total,
            items,
        }
    }
}

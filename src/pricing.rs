//! Promotion pricing helpers.
//!
//! Order items snapshot the unit price *after* discount at purchase time, so
//! these helpers are the single place promotion math happens.

/// Clamps a promotion percent to the valid 0-100 range. Non-finite input
/// counts as "no promotion".
pub fn normalize_promotion_percent(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Unit price after applying the promotion percent to the list price.
pub fn discounted_unit_price(price: f64, promotion_percent: f64) -> f64 {
    if !price.is_finite() {
        return 0.0;
    }
    let p = normalize_promotion_percent(promotion_percent);
    if p <= 0.0 {
        return price;
    }
    price * (1.0 - p / 100.0)
}

/// Subtotals for a set of `(list price, promotion percent, quantity)` lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    pub original_subtotal: f64,
    pub discounted_subtotal: f64,
    pub discount_total: f64,
}

pub fn cart_totals(lines: impl IntoIterator<Item = (f64, f64, u32)>) -> CartTotals {
    let mut original = 0.0;
    let mut discounted = 0.0;
    for (price, promo, qty) in lines {
        original += price * qty as f64;
        discounted += discounted_unit_price(price, promo) * qty as f64;
    }
    CartTotals {
        original_subtotal: original,
        discounted_subtotal: discounted,
        discount_total: (original - discounted).max(0.0),
    }
}

//! Client-local cart state for one signed-in session.

use crate::model::{CartLine, LocalCartItem, Product, ProductId, UserId};
use tracing::debug;

/// The authoritative local cart, plus the one-shot session flags that guard
/// hydration and legacy migration.
///
/// Flag lifecycle is explicit: [`sign_in`](Self::sign_in) re-arms both flags
/// for the new identity, [`sign_out`](Self::sign_out) clears the session.
/// Hydration runs at most once per signed-in session so a stale remote
/// snapshot can never clobber subsequent local edits.
#[derive(Debug, Default)]
pub struct CartSession {
    user: Option<UserId>,
    items: Vec<LocalCartItem>,
    hydrated: bool,
    migrated: bool,
}

impl CartSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn items(&self) -> &[LocalCartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Starts a session for `user`, re-arming the hydration and migration
    /// guards.
    pub fn sign_in(&mut self, user: UserId) {
        self.user = Some(user);
        self.hydrated = false;
        self.migrated = false;
    }

    /// Ends the session and drops the local cart.
    pub fn sign_out(&mut self) {
        self.user = None;
        self.items.clear();
        self.hydrated = false;
        self.migrated = false;
    }

    /// Adds one unit of `product`, capped at available stock. Out-of-stock
    /// products are ignored. Returns whether the cart changed.
    pub fn add(&mut self, product: &Product) -> bool {
        if product.stock == 0 {
            return false;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            if item.quantity >= product.stock {
                return false;
            }
            item.quantity += 1;
            return true;
        }
        self.items.push(LocalCartItem::new(product.clone(), 1));
        true
    }

    /// Sets the quantity for a product already in the cart, clamped to
    /// `[1, stock]`. A line never reaches zero; use [`remove`](Self::remove)
    /// to drop it instead.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| &i.product.id == product_id) {
            let cap = item.product.stock.max(1);
            item.quantity = quantity.clamp(1, cap);
        }
    }

    pub fn remove(&mut self, product_id: &ProductId) {
        self.items.retain(|i| &i.product.id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Compact `(product id, quantity)` snapshot, sorted by product id for
    /// stable comparison against remote cart lines.
    pub fn desired(&self) -> Vec<(ProductId, u32)> {
        let mut out: Vec<_> = self
            .items
            .iter()
            .map(|i| (i.product.id.clone(), i.quantity))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Populates an empty local cart from the remote snapshot, resolving
    /// each line against the loaded catalog. Lines referencing unknown or
    /// deleted products are dropped.
    ///
    /// Runs at most once per session, and only when there is something to
    /// hydrate from: a signed-in user, an empty local cart, a non-empty
    /// remote snapshot, and a loaded catalog. Returns whether it hydrated.
    pub fn hydrate(&mut self, remote: &[CartLine], catalog: &[Product]) -> bool {
        if self.user.is_none() || self.hydrated {
            return false;
        }
        if !self.items.is_empty() || remote.is_empty() || catalog.is_empty() {
            return false;
        }

        let resolved: Vec<LocalCartItem> = remote
            .iter()
            .filter_map(|line| {
                catalog
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .map(|p| LocalCartItem::new(p.clone(), line.quantity.max(1)))
            })
            .collect();
        if resolved.is_empty() {
            return false;
        }

        debug!(lines = resolved.len(), "Hydrated local cart from remote");
        self.items = resolved;
        self.hydrated = true;
        true
    }

    /// Whether the legacy-cart migration has already been attempted this
    /// session. Consulted and latched by
    /// [`CartSyncService::migrate_once`](crate::cart::CartSyncService::migrate_once);
    /// the migration itself is idempotent, this flag only avoids repeat
    /// round-trips.
    pub fn migrated(&self) -> bool {
        self.migrated
    }

    pub fn mark_migrated(&mut self) {
        self.migrated = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Timestamp;

    fn product(id: &str, stock: u32) -> Product {
        Product::new(ProductId::new(id), id, 10.0, stock)
    }

    fn line(id: &str, qty: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            quantity: qty,
            updated_at: Timestamp(1),
        }
    }

    #[test]
    fn add_caps_at_stock_and_ignores_out_of_stock() {
        let mut session = CartSession::new();
        assert!(!session.add(&product("none", 0)));

        let p = product("p", 2);
        assert!(session.add(&p));
        assert!(session.add(&p));
        assert!(!session.add(&p), "third unit exceeds stock 2");
        assert_eq!(session.items()[0].quantity, 2);
    }

    #[test]
    fn set_quantity_clamps_to_one_through_stock() {
        let mut session = CartSession::new();
        session.add(&product("p", 5));
        session.set_quantity(&ProductId::new("p"), 0);
        assert_eq!(session.items()[0].quantity, 1);
        session.set_quantity(&ProductId::new("p"), 99);
        assert_eq!(session.items()[0].quantity, 5);
    }

    #[test]
    fn desired_is_sorted_by_product_id() {
        let mut session = CartSession::new();
        session.add(&product("b", 3));
        session.add(&product("a", 3));
        let desired = session.desired();
        assert_eq!(desired[0].0, ProductId::new("a"));
        assert_eq!(desired[1].0, ProductId::new("b"));
    }

    #[test]
    fn hydrate_runs_once_and_drops_unknown_products() {
        let mut session = CartSession::new();
        session.sign_in(UserId::new("u"));
        let catalog = vec![product("a", 5)];
        let remote = vec![line("a", 2), line("ghost", 1)];

        assert!(session.hydrate(&remote, &catalog));
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].quantity, 2);

        // A later, different snapshot must not clobber the session again.
        session.clear();
        assert!(!session.hydrate(&remote, &catalog));
    }

    #[test]
    fn hydrate_requires_sign_in_and_empty_local_cart() {
        let mut session = CartSession::new();
        let catalog = vec![product("a", 5)];
        assert!(!session.hydrate(&[line("a", 1)], &catalog), "signed out");

        session.sign_in(UserId::new("u"));
        session.add(&product("b", 5));
        assert!(
            !session.hydrate(&[line("a", 1)], &catalog),
            "local cart is not empty"
        );
    }

    #[test]
    fn sign_in_rearms_hydration() {
        let mut session = CartSession::new();
        session.sign_in(UserId::new("u1"));
        let catalog = vec![product("a", 5)];
        assert!(session.hydrate(&[line("a", 1)], &catalog));

        session.sign_out();
        assert!(session.is_empty());
        session.sign_in(UserId::new("u2"));
        assert!(session.hydrate(&[line("a", 3)], &catalog));
        assert_eq!(session.items()[0].quantity, 3);
    }
}

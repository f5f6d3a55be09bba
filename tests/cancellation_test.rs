use storefront_core::model::{
    LocalCartItem, OrderDraft, OrderId, OrderStatus, PaymentMethod, Product, ProductId, UserId,
};
use storefront_core::orders::TransitionError;
use storefront_core::runtime::StorefrontSystem;

fn product(id: &str, stock: u32) -> Product {
    Product::new(ProductId::new(id), id, 10.0, stock)
}

async fn place_order(system: &StorefrontSystem, cart: &[LocalCartItem]) -> OrderId {
    let user = UserId::new("alice");
    let draft = OrderDraft::from_cart(user.clone(), cart, PaymentMethod::Qr, "2026-08-29");
    system
        .checkout
        .place_order(Some(&user), draft)
        .await
        .expect("Failed to place order")
        .id
}

async fn stock_of(system: &StorefrontSystem, id: &str) -> u32 {
    system
        .store
        .get_product(&ProductId::new(id))
        .await
        .unwrap()
        .expect("Product not found")
        .value
        .stock
}

/// Cancelling a checkout-adjusted order puts the purchased quantities back
/// and records the audit fields.
#[tokio::test]
async fn test_cancellation_restores_stock() {
    let system = StorefrontSystem::new();

    let widget = product("widget", 10);
    system.store.put_product(widget.clone()).await.unwrap();

    let order_id = place_order(&system, &[LocalCartItem::new(widget, 4)]).await;
    assert_eq!(stock_of(&system, "widget").await, 6);

    let order = system
        .orders
        .transition(&order_id, OrderStatus::Cancelled)
        .await
        .expect("Transition failed")
        .expect("Order vanished");

    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(order.previous_status, Some(OrderStatus::Pending));
    assert!(order.status_updated_at.is_some());
    assert!(!order.stock_adjusted);
    assert!(order.stock_restored);
    assert_eq!(stock_of(&system, "widget").await, 10);

    system.shutdown().await.unwrap();
}

/// The restore latch: re-applying Cancelled is a valid no-op transition and
/// must not restore stock a second time.
#[tokio::test]
async fn test_double_cancel_restores_only_once() {
    let system = StorefrontSystem::new();

    let widget = product("widget", 10);
    system.store.put_product(widget.clone()).await.unwrap();

    let order_id = place_order(&system, &[LocalCartItem::new(widget, 3)]).await;

    system
        .orders
        .transition(&order_id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(stock_of(&system, "widget").await, 10);

    let order = system
        .orders
        .transition(&order_id, OrderStatus::Cancelled)
        .await
        .unwrap()
        .expect("Order vanished");
    assert!(order.stock_restored);
    assert_eq!(
        stock_of(&system, "widget").await,
        10,
        "Second cancellation must not restore stock again"
    );

    system.shutdown().await.unwrap();
}

/// A product deleted from the catalog after purchase is skipped by the
/// restore; the rest of the order still restores and the latch still flips.
#[tokio::test]
async fn test_restore_skips_deleted_products() {
    let system = StorefrontSystem::new();

    let keeper = product("keeper", 5);
    let doomed = product("doomed", 5);
    system.store.put_product(keeper.clone()).await.unwrap();
    system.store.put_product(doomed.clone()).await.unwrap();

    let order_id = place_order(
        &system,
        &[
            LocalCartItem::new(keeper, 2),
            LocalCartItem::new(doomed, 2),
        ],
    )
    .await;

    assert!(system
        .store
        .remove_product(&ProductId::new("doomed"))
        .await
        .unwrap());

    let order = system
        .orders
        .transition(&order_id, OrderStatus::Cancelled)
        .await
        .unwrap()
        .expect("Order vanished");
    assert!(order.stock_restored);

    assert_eq!(stock_of(&system, "keeper").await, 5);
    assert!(
        system
            .store
            .get_product(&ProductId::new("doomed"))
            .await
            .unwrap()
            .is_none(),
        "Deleted product must not be recreated by the restore"
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_transitions_are_rejected() {
    let system = StorefrontSystem::new();

    let widget = product("widget", 5);
    system.store.put_product(widget.clone()).await.unwrap();
    let order_id = place_order(&system, &[LocalCartItem::new(widget, 1)]).await;

    // Pending cannot jump straight to Delivered.
    let result = system
        .orders
        .transition(&order_id, OrderStatus::Delivered)
        .await;
    assert_eq!(
        result.unwrap_err(),
        TransitionError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Delivered,
        }
    );

    // Walk the happy path, then verify terminal states stay put.
    system
        .orders
        .transition(&order_id, OrderStatus::Shipped)
        .await
        .unwrap();
    system
        .orders
        .transition(&order_id, OrderStatus::Delivered)
        .await
        .unwrap();

    let result = system
        .orders
        .transition(&order_id, OrderStatus::Cancelled)
        .await;
    assert_eq!(
        result.unwrap_err(),
        TransitionError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Cancelled,
        }
    );

    system.shutdown().await.unwrap();
}

/// Transitioning an order that does not exist is an explicit no-op.
#[tokio::test]
async fn test_missing_order_is_a_noop() {
    let system = StorefrontSystem::new();

    let result = system
        .orders
        .transition(&OrderId("order_999".into()), OrderStatus::Cancelled)
        .await
        .expect("Transition should not fail");
    assert_eq!(result, None);

    system.shutdown().await.unwrap();
}

/// Interleaved checkout and cancellation over the same product: stock must
/// balance out to initial minus the units still held by live orders.
#[tokio::test]
async fn test_cancel_and_checkout_conserve_stock() {
    let system = StorefrontSystem::new();

    let widget = product("widget", 3);
    system.store.put_product(widget.clone()).await.unwrap();

    // Buy all 3, cancel, buy 2 again.
    let first = place_order(&system, &[LocalCartItem::new(widget.clone(), 3)]).await;
    assert_eq!(stock_of(&system, "widget").await, 0);

    system
        .orders
        .transition(&first, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(stock_of(&system, "widget").await, 3);

    place_order(&system, &[LocalCartItem::new(widget, 2)]).await;
    assert_eq!(stock_of(&system, "widget").await, 1);

    system.shutdown().await.unwrap();
}

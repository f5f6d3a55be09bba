use storefront_core::checkout::CheckoutError;
use storefront_core::model::{
    LocalCartItem, OrderDraft, PaymentMethod, Product, ProductId, UserId,
};
use storefront_core::runtime::StorefrontSystem;

fn product(id: &str, price: f64, stock: u32) -> Product {
    Product::new(ProductId::new(id), id, price, stock)
}

fn draft_for(user: &str, cart: &[LocalCartItem]) -> OrderDraft {
    OrderDraft::from_cart(UserId::new(user), cart, PaymentMethod::Qr, "2026-08-29")
}

/// Full checkout happy path: stock decremented, order recorded as adjusted.
#[tokio::test]
async fn test_checkout_decrements_stock_and_creates_order() {
    let system = StorefrontSystem::new();
    let user = UserId::new("alice");

    let widget = product("widget", 25.50, 100);
    system.store.put_product(widget.clone()).await.unwrap();

    let cart = vec![LocalCartItem::new(widget, 5)];
    let order = system
        .checkout
        .place_order(Some(&user), draft_for("alice", &cart))
        .await
        .expect("Failed to place order");

    assert_eq!(order.user_id, user);
    assert_eq!(order.total, 127.50);
    assert!(order.stock_adjusted);
    assert!(!order.stock_restored);

    let stock = system
        .store
        .get_product(&ProductId::new("widget"))
        .await
        .unwrap()
        .expect("Product not found")
        .value
        .stock;
    assert_eq!(stock, 95, "Stock should be decremented by order quantity");

    // The order is readable back under its assigned id.
    let fetched = system
        .store
        .get_order(&order.id)
        .await
        .unwrap()
        .expect("Order not found");
    assert_eq!(fetched.value, order);

    system.shutdown().await.expect("Failed to shutdown system");
}

/// A single short line fails the whole order and leaves every product
/// untouched, including the ones that had plenty of stock.
#[tokio::test]
async fn test_insufficient_stock_fails_atomically() {
    let system = StorefrontSystem::new();
    let user = UserId::new("alice");

    let plenty = product("plenty", 10.0, 50);
    let scarce = product("scarce", 10.0, 1);
    system.store.put_product(plenty.clone()).await.unwrap();
    system.store.put_product(scarce.clone()).await.unwrap();

    let cart = vec![
        LocalCartItem::new(plenty, 3),
        LocalCartItem::new(scarce, 2),
    ];
    let result = system
        .checkout
        .place_order(Some(&user), draft_for("alice", &cart))
        .await;
    assert_eq!(
        result.unwrap_err(),
        CheckoutError::InsufficientStock {
            product_id: ProductId::new("scarce"),
            requested: 2,
            available: 1,
        }
    );

    for (id, expected) in [("plenty", 50), ("scarce", 1)] {
        let stock = system
            .store
            .get_product(&ProductId::new(id))
            .await
            .unwrap()
            .unwrap()
            .value
            .stock;
        assert_eq!(stock, expected, "Stock should not change on failed order");
    }

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_checkout_rejects_missing_product_and_bad_input() {
    let system = StorefrontSystem::new();
    let user = UserId::new("alice");

    let ghost = product("ghost", 10.0, 5);
    let cart = vec![LocalCartItem::new(ghost, 1)];

    // Product was never seeded into the catalog.
    let result = system
        .checkout
        .place_order(Some(&user), draft_for("alice", &cart))
        .await;
    assert_eq!(
        result.unwrap_err(),
        CheckoutError::ProductNotFound(ProductId::new("ghost"))
    );

    // Anonymous checkout is refused outright.
    let result = system
        .checkout
        .place_order(None, draft_for("alice", &cart))
        .await;
    assert_eq!(result.unwrap_err(), CheckoutError::NotSignedIn);

    // As is an order with nothing in it.
    let result = system
        .checkout
        .place_order(Some(&user), draft_for("alice", &[]))
        .await;
    assert_eq!(result.unwrap_err(), CheckoutError::EmptyOrder);

    system.shutdown().await.unwrap();
}

/// Concurrent buyers racing for limited stock: the store must never
/// oversell. Success counts depend on scheduling, so the assertion is
/// conservation — units sold plus units remaining equals the initial stock.
#[tokio::test]
async fn test_concurrent_checkouts_never_oversell() {
    let system = StorefrontSystem::new();

    let initial_stock = 7;
    let limited = product("limited", 10.0, initial_stock);
    system.store.put_product(limited.clone()).await.unwrap();

    let mut handles = vec![];
    for i in 0..10 {
        let checkout = system.checkout.clone();
        let item = LocalCartItem::new(limited.clone(), 2);
        let user = UserId::new(format!("buyer_{i}"));
        handles.push(tokio::spawn(async move {
            let draft =
                OrderDraft::from_cart(user.clone(), &[item], PaymentMethod::Bank, "2026-08-29");
            checkout.place_order(Some(&user), draft).await
        }));
    }

    let mut successful: u32 = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(order) => {
                assert!(order.stock_adjusted);
                successful += 1;
            }
            Err(CheckoutError::InsufficientStock { .. }) | Err(CheckoutError::Conflict) => {}
            Err(e) => panic!("Unexpected checkout error: {e}"),
        }
    }

    let remaining = system
        .store
        .get_product(&ProductId::new("limited"))
        .await
        .unwrap()
        .unwrap()
        .value
        .stock;
    assert_eq!(
        successful * 2 + remaining,
        initial_stock,
        "Units sold plus units remaining must equal initial stock"
    );
    assert!(successful <= 3, "At most 3 orders of 2 fit in stock of 7");

    system.shutdown().await.unwrap();
}

/// Duplicate product rows in a draft are aggregated before validation, so a
/// split-demand draft cannot sneak past the stock check.
#[tokio::test]
async fn test_duplicate_lines_validate_as_one_demand() {
    let system = StorefrontSystem::new();
    let user = UserId::new("alice");

    let widget = product("widget", 10.0, 3);
    system.store.put_product(widget.clone()).await.unwrap();

    let cart = vec![
        LocalCartItem::new(widget.clone(), 2),
        LocalCartItem::new(widget, 2),
    ];
    let result = system
        .checkout
        .place_order(Some(&user), draft_for("alice", &cart))
        .await;
    assert!(matches!(
        result,
        Err(CheckoutError::InsufficientStock {
            requested: 4,
            available: 3,
            ..
        })
    ));

    system.shutdown().await.unwrap();
}

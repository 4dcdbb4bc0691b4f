//! End-to-end operation sequences through the public cart interface.
//!
//! These tests exercise the store the way a UI would: a sequence of
//! add/remove/update intents against a scripted inventory, asserting the
//! in-memory cart, the persisted blob, and the notices a consumer would
//! surface.

#![allow(clippy::unwrap_used)]

use cartwheel_cart::CartError;
use cartwheel_cart::notice::{CartOp, Notice, NoticeSink, Severity};
use cartwheel_core::ProductId;
use cartwheel_integration_tests::{ScriptedInventory, TestCart};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn test_full_shopping_flow_keeps_memory_and_blob_in_sync() {
    init_tracing();
    let ctx = TestCart::new().await;
    ctx.inventory.set_stock(1, 5);
    ctx.inventory.set_stock(2, 3);

    // First adds insert amount 1 with catalog display data, in add order.
    ctx.store.add_product(ProductId::new(1)).await.unwrap();
    ctx.store.add_product(ProductId::new(2)).await.unwrap();
    ctx.assert_memory_matches_blob().await;

    let cart = ctx.store.cart().await;
    let ids: Vec<i64> = cart.items().iter().map(|i| i.id.as_i64()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(
        cart.get(ProductId::new(1)).unwrap().title,
        ScriptedInventory::descriptor(1).title
    );

    // Repeat add increments in place, no duplicate line-item.
    ctx.store.add_product(ProductId::new(1)).await.unwrap();
    ctx.assert_memory_matches_blob().await;
    let cart = ctx.store.cart().await;
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);

    // Absolute quantity update within stock.
    ctx.store
        .update_product_amount(ProductId::new(2), 3)
        .await
        .unwrap();
    ctx.assert_memory_matches_blob().await;
    assert_eq!(
        ctx.store.cart().await.get(ProductId::new(2)).unwrap().amount,
        3
    );

    // Removal keeps the remaining items in original relative order.
    ctx.store.remove_product(ProductId::new(1)).await.unwrap();
    ctx.assert_memory_matches_blob().await;
    let cart = ctx.store.cart().await;
    let ids: Vec<i64> = cart.items().iter().map(|i| i.id.as_i64()).collect();
    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn test_stock_changes_between_operations_are_honored() {
    let ctx = TestCart::new().await;
    ctx.inventory.set_stock(1, 5);

    ctx.store.add_product(ProductId::new(1)).await.unwrap();
    ctx.store.add_product(ProductId::new(1)).await.unwrap();

    // Stock shrank behind our back; the next add must see the fresh figure.
    ctx.inventory.set_stock(1, 2);
    let err = ctx.store.add_product(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(
        err,
        CartError::StockExceeded {
            requested: 3,
            available: 2
        }
    ));

    // Restock and retry.
    ctx.inventory.set_stock(1, 10);
    ctx.store.add_product(ProductId::new(1)).await.unwrap();
    assert_eq!(
        ctx.store.cart().await.get(ProductId::new(1)).unwrap().amount,
        3
    );

    // One stock lookup per mutating call.
    assert_eq!(ctx.inventory.stock_calls(), 4);
}

#[tokio::test]
async fn test_offline_inventory_surfaces_as_notice_and_leaves_cart_alone() {
    let ctx = TestCart::new().await;
    ctx.inventory.set_stock(1, 5);
    ctx.store.add_product(ProductId::new(1)).await.unwrap();

    ctx.inventory.go_offline();
    let err = ctx.store.add_product(ProductId::new(1)).await.unwrap_err();

    // The consumer edge translates the tag into a user-facing notice.
    ctx.notices.publish(Notice::for_error(&err, CartOp::Add));

    let published = ctx.notices.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].severity, Severity::Error);
    assert_eq!(published[0].message, "Could not add the product to the cart");

    // Nothing moved.
    assert_eq!(
        ctx.store.cart().await.get(ProductId::new(1)).unwrap().amount,
        1
    );
    ctx.assert_memory_matches_blob().await;

    // Back online, the same intent succeeds.
    ctx.inventory.go_online();
    ctx.store.add_product(ProductId::new(1)).await.unwrap();
    assert_eq!(
        ctx.store.cart().await.get(ProductId::new(1)).unwrap().amount,
        2
    );
}

#[tokio::test]
async fn test_rejections_translate_to_the_expected_notices() {
    let ctx = TestCart::new().await;
    ctx.inventory.set_stock(7, 0);

    let err = ctx.store.add_product(ProductId::new(7)).await.unwrap_err();
    ctx.notices.publish(Notice::for_error(&err, CartOp::Add));

    let err = ctx.store.remove_product(ProductId::new(7)).await.unwrap_err();
    ctx.notices.publish(Notice::for_error(&err, CartOp::Remove));

    let messages: Vec<String> = ctx
        .notices
        .published()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Requested quantity is out of stock".to_string(),
            "Could not remove the product from the cart".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_cart_survives_reopening_from_the_persisted_blob() {
    let ctx = TestCart::new().await;
    ctx.inventory.set_stock(1, 5);
    ctx.inventory.set_stock(2, 5);
    ctx.store.add_product(ProductId::new(1)).await.unwrap();
    ctx.store.add_product(ProductId::new(2)).await.unwrap();
    ctx.store.add_product(ProductId::new(2)).await.unwrap();

    // A later session opens over the same blob.
    let blob = ctx.persisted().await.unwrap();
    let reopened = TestCart::with_blob(&serde_json::to_string(&blob).unwrap()).await;

    assert_eq!(reopened.store.cart().await, ctx.store.cart().await);
}

#[tokio::test]
async fn test_reopening_over_a_malformed_blob_starts_fresh() {
    init_tracing();
    let ctx = TestCart::with_blob("definitely not json").await;

    assert!(ctx.store.cart().await.is_empty());

    // The first successful mutation replaces the corrupt blob.
    ctx.inventory.set_stock(1, 1);
    ctx.store.add_product(ProductId::new(1)).await.unwrap();
    ctx.assert_memory_matches_blob().await;
}

#[tokio::test]
async fn test_concurrent_mutations_serialize() {
    let ctx = TestCart::new().await;
    ctx.inventory.set_stock(1, 10);
    ctx.inventory.set_stock(2, 10);

    let (a, b, c) = tokio::join!(
        ctx.store.add_product(ProductId::new(1)),
        ctx.store.add_product(ProductId::new(2)),
        ctx.store.add_product(ProductId::new(1)),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    let cart = ctx.store.cart().await;
    assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
    assert_eq!(cart.get(ProductId::new(2)).unwrap().amount, 1);
    assert_eq!(cart.total_quantity(), 3);
    ctx.assert_memory_matches_blob().await;
}

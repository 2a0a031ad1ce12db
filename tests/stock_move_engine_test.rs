mod common;

use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use common::TestApp;
use stocktrack_api::entities::{product, stock_move};
use stocktrack_api::services::products::NewProduct;
use stocktrack_api::services::stock_moves::{NewStockMove, RejectionReason, StockMoveError};

/// Seed straight through the product service; the engine does not care how
/// the product came to exist.
async fn seed_product(app: &TestApp, sku: &str) -> i32 {
    app.state
        .services
        .products
        .create_product(NewProduct {
            sku: sku.to_string(),
            name: format!("{sku} test product"),
            unit_price: dec!(4.25),
        })
        .await
        .expect("seed product")
        .id
}

fn move_req(product_id: i32, quantity: i32, move_type: &str) -> NewStockMove {
    NewStockMove {
        product_id,
        quantity,
        move_type: move_type.to_string(),
        note: None,
    }
}

async fn stock_of(app: &TestApp, product_id: i32) -> i32 {
    product::Entity::find_by_id(product_id)
        .one(app.state.db.as_ref())
        .await
        .expect("query product")
        .expect("product exists")
        .stock
}

async fn ledger_len(app: &TestApp, product_id: i32) -> u64 {
    stock_move::Entity::find()
        .filter(stock_move::Column::ProductId.eq(product_id))
        .count(app.state.db.as_ref())
        .await
        .expect("count moves")
}

#[tokio::test]
async fn in_move_adds_quantity_and_writes_one_ledger_row() {
    let app = TestApp::new().await;
    let id = seed_product(&app, "ENG-IN").await;
    let engine = &app.state.services.stock_moves;

    let entry = engine
        .apply_move(NewStockMove {
            product_id: id,
            quantity: 7,
            move_type: "IN".to_string(),
            note: Some("initial receipt".to_string()),
        })
        .await
        .expect("IN move applies");

    assert_eq!(entry.product_id, id);
    assert_eq!(entry.quantity, 7);
    assert_eq!(entry.move_type, "IN");
    assert_eq!(entry.note.as_deref(), Some("initial receipt"));

    assert_eq!(stock_of(&app, id).await, 7);
    assert_eq!(ledger_len(&app, id).await, 1);
}

#[tokio::test]
async fn out_move_can_drain_to_zero_but_not_below() {
    let app = TestApp::new().await;
    let id = seed_product(&app, "ENG-OUT").await;
    let engine = &app.state.services.stock_moves;

    engine.apply_move(move_req(id, 5, "IN")).await.expect("seed stock");

    // Draining the whole balance is allowed
    engine
        .apply_move(move_req(id, 5, "OUT"))
        .await
        .expect("OUT of the full balance applies");
    assert_eq!(stock_of(&app, id).await, 0);

    // One more unit is not
    let err = engine
        .apply_move(move_req(id, 1, "OUT"))
        .await
        .expect_err("OUT below zero is rejected");
    assert!(matches!(
        err,
        StockMoveError::Rejected(RejectionReason::InsufficientStock)
    ));

    // Rejection left no trace
    assert_eq!(stock_of(&app, id).await, 0);
    assert_eq!(ledger_len(&app, id).await, 2);
}

#[tokio::test]
async fn non_positive_quantity_is_rejected_for_both_directions() {
    let app = TestApp::new().await;
    let id = seed_product(&app, "ENG-QTY").await;
    let engine = &app.state.services.stock_moves;

    for (quantity, move_type) in [(0, "IN"), (0, "OUT"), (-3, "IN"), (-3, "OUT")] {
        let err = engine
            .apply_move(move_req(id, quantity, move_type))
            .await
            .expect_err("non-positive quantity is rejected");
        assert!(matches!(
            err,
            StockMoveError::Rejected(RejectionReason::InvalidQuantity)
        ));
    }

    assert_eq!(stock_of(&app, id).await, 0);
    assert_eq!(ledger_len(&app, id).await, 0);
}

#[tokio::test]
async fn unknown_move_type_is_rejected_before_any_stock_check() {
    let app = TestApp::new().await;
    // Product with zero stock: a stock check would say "insufficient", but
    // the type check must win.
    let id = seed_product(&app, "ENG-TYPE").await;
    let engine = &app.state.services.stock_moves;

    for move_type in ["SIDEWAYS", "in", "out", ""] {
        let err = engine
            .apply_move(move_req(id, 5, move_type))
            .await
            .expect_err("unknown move_type is rejected");
        assert!(matches!(
            err,
            StockMoveError::Rejected(RejectionReason::InvalidMoveType)
        ));
    }

    assert_eq!(ledger_len(&app, id).await, 0);
}

#[tokio::test]
async fn missing_product_wins_over_every_other_violation() {
    let app = TestApp::new().await;
    let engine = &app.state.services.stock_moves;

    // Invalid type AND invalid quantity AND no such product: existence is
    // checked first, so the caller sees PRODUCT_NOT_FOUND.
    let err = engine
        .apply_move(move_req(987_654, -1, "SIDEWAYS"))
        .await
        .expect_err("missing product is rejected");
    assert!(matches!(
        err,
        StockMoveError::Rejected(RejectionReason::ProductNotFound)
    ));
}

#[tokio::test]
async fn ledger_reconstructs_current_stock() {
    let app = TestApp::new().await;
    let id = seed_product(&app, "ENG-SUM").await;
    let engine = &app.state.services.stock_moves;

    for (quantity, move_type) in [(10, "IN"), (4, "OUT"), (2, "IN"), (7, "OUT"), (1, "IN")] {
        engine
            .apply_move(move_req(id, quantity, move_type))
            .await
            .expect("move applies");
    }

    let moves = stock_move::Entity::find()
        .filter(stock_move::Column::ProductId.eq(id))
        .all(app.state.db.as_ref())
        .await
        .expect("load ledger");

    let signed_sum: i32 = moves
        .iter()
        .map(|m| if m.move_type == "IN" { m.quantity } else { -m.quantity })
        .sum();

    assert_eq!(signed_sum, 2);
    assert_eq!(stock_of(&app, id).await, signed_sum);
}

#[tokio::test]
async fn deleting_a_product_cascades_to_its_ledger() {
    let app = TestApp::new().await;
    let id = seed_product(&app, "ENG-CASCADE").await;
    let engine = &app.state.services.stock_moves;

    engine.apply_move(move_req(id, 3, "IN")).await.expect("seed stock");
    assert_eq!(ledger_len(&app, id).await, 1);

    let deleted = app
        .state
        .services
        .products
        .delete_product(id)
        .await
        .expect("delete product");
    assert_eq!(deleted, 1);

    assert_eq!(ledger_len(&app, id).await, 0);
}

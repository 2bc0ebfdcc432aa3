//! Live-database tests for order placement transactions.
//!
//! These require a running `PostgreSQL` instance and only execute when
//! `DATABASE_URL` is set; otherwise each test logs a skip and returns.
//! Embedded migrations are applied on connect, so a bare database works.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p punto-y-lana-integration-tests

use rust_decimal::Decimal;
use secrecy::SecretString;

use punto_y_lana_core::{Category, Email, ProductId, Role};
use punto_y_lana_server::db::orders::ShippingInfo;
use punto_y_lana_server::db::{self, ProductRepository, UserRepository};
use punto_y_lana_server::models::{ProductDraft, User};
use punto_y_lana_server::services::{
    EmailService, NewOrder, NewOrderItem, OrderError, OrderService,
};

/// Connect and migrate, or `None` when no database is configured.
async fn test_pool() -> Option<sqlx::PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("skipping: DATABASE_URL not set");
        return None;
    };

    let pool = db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to test database");
    db::MIGRATOR.run(&pool).await.expect("Failed to migrate");

    Some(pool)
}

/// Unique per-run email so repeated runs never collide on the constraint.
fn unique_email(tag: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{tag}-{nanos}@puntoylana.test")
}

async fn test_user(pool: &sqlx::PgPool, tag: &str) -> User {
    let email = Email::parse(&unique_email(tag)).expect("valid email");
    UserRepository::new(pool)
        .create(Some("Test"), None, &email, "unused-hash", Role::User)
        .await
        .expect("Failed to create test user")
}

fn yarn_draft(name: &str, stock: Option<i32>) -> ProductDraft {
    ProductDraft {
        name: name.to_owned(),
        description: None,
        price: Decimal::new(1250, 2),
        stock,
        image_url: None,
        digital_url: None,
        category: Category::Yarn,
    }
}

fn order_of(items: Vec<NewOrderItem>) -> NewOrder {
    NewOrder {
        items,
        shipping: ShippingInfo {
            address: Some("Calle 10 #4-21".to_owned()),
            phone: None,
            notes: None,
            payment_method: Some("nequi".to_owned()),
        },
    }
}

fn line(product_id: ProductId, quantity: i32) -> NewOrderItem {
    NewOrderItem {
        product_id,
        quantity,
    }
}

#[tokio::test]
async fn failed_order_rolls_back_stock_and_persists_nothing() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let products = ProductRepository::new(&pool);
    let product = products
        .create(&yarn_draft("Lana rollback", Some(5)))
        .await
        .expect("Failed to create product");
    let user = test_user(&pool, "rollback").await;

    let email = EmailService::new(None, "noreply@puntoylana.test").expect("simulation mode");
    let orders = OrderService::new(&pool, &email);

    // A missing product aborts the whole order, including the valid line
    let missing = ProductId::new(i64::MAX);
    let result = orders
        .create_order(&user, order_of(vec![line(product.id, 1), line(missing, 1)]))
        .await;
    assert!(matches!(result, Err(OrderError::ProductNotFound(id)) if id == missing));

    // Requesting more than the shelf holds aborts too
    let result = orders
        .create_order(&user, order_of(vec![line(product.id, 8)]))
        .await;
    assert!(matches!(
        result,
        Err(OrderError::InsufficientStock {
            available: 5,
            requested: 8,
            ..
        })
    ));

    // The same product split over two lines is checked as one quantity
    let result = orders
        .create_order(&user, order_of(vec![line(product.id, 3), line(product.id, 3)]))
        .await;
    assert!(matches!(
        result,
        Err(OrderError::InsufficientStock {
            available: 5,
            requested: 6,
            ..
        })
    ));

    // Nothing above changed stock or persisted an order
    let reloaded = products
        .get(product.id)
        .await
        .expect("Failed to reload product")
        .expect("product exists");
    assert_eq!(reloaded.stock, Some(5));

    let mine = orders.list_for_user(&user).await.expect("Failed to list");
    assert!(mine.is_empty());
}

#[tokio::test]
async fn placed_order_decrements_stock_and_merges_duplicate_lines() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let products = ProductRepository::new(&pool);
    let product = products
        .create(&yarn_draft("Lana descuento", Some(5)))
        .await
        .expect("Failed to create product");
    let user = test_user(&pool, "placed").await;

    let email = EmailService::new(None, "noreply@puntoylana.test").expect("simulation mode");
    let orders = OrderService::new(&pool, &email);

    let order = orders
        .create_order(&user, order_of(vec![line(product.id, 2), line(product.id, 1)]))
        .await
        .expect("Failed to place order");

    // 12.50 * 3, merged into one line item
    assert_eq!(order.total_amount, Decimal::new(3750, 2));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 3);

    let reloaded = products
        .get(product.id)
        .await
        .expect("Failed to reload product")
        .expect("product exists");
    assert_eq!(reloaded.stock, Some(2));
}

//! Order placement and fulfilment service.
//!
//! Placement runs in a single database transaction: every referenced
//! product row is locked, stock is validated against the locked values,
//! prices are captured, stock is decremented, and the order plus its line
//! items are inserted. Nothing is written unless every line succeeds.
//! The confirmation email goes out after commit and never fails the order.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use punto_y_lana_core::{OrderId, ProductId};

use crate::db::orders::ShippingInfo;
use crate::db::{OrderRepository, ProductRepository, RepositoryError};
use crate::models::{Order, Product, User};
use crate::services::email::EmailService;

/// Errors that can occur while placing or updating an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order contained no items.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// A line item quantity was zero or negative.
    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity {
        product_id: ProductId,
        quantity: i32,
    },

    /// A referenced product does not exist.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Not enough stock for a tracked product.
    #[error("insufficient stock for '{product_name}': {available} available, {requested} requested")]
    InsufficientStock {
        product_name: String,
        available: i32,
        requested: i32,
    },

    /// Order not found.
    #[error("order not found")]
    OrderNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// One requested line of a new order.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// A new order as submitted by the client.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<NewOrderItem>,
    pub shipping: ShippingInfo,
}

/// Order placement and fulfilment service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
    email: &'a EmailService,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, email: &'a EmailService) -> Self {
        Self { pool, email }
    }

    /// Place an order for a user.
    ///
    /// Stock validation and decrement happen under row locks inside one
    /// transaction, so two concurrent orders for the last unit cannot both
    /// succeed. Untracked products (`stock` is `NULL`) skip both steps.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyOrder` or `OrderError::InvalidQuantity`
    /// before touching the database. Returns `OrderError::ProductNotFound`
    /// or `OrderError::InsufficientStock` if validation against locked rows
    /// fails; the transaction rolls back and no stock changes.
    pub async fn create_order(&self, user: &User, new_order: NewOrder) -> Result<Order, OrderError> {
        validate_items(&new_order.items)?;
        let items = normalize_items(&new_order.items);

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        // Lock every product row and validate stock against the locked values
        let mut lines: Vec<(Product, i32)> = Vec::with_capacity(items.len());
        for item in &items {
            let product = ProductRepository::lock_for_update(&mut tx, item.product_id)
                .await?
                .ok_or(OrderError::ProductNotFound(item.product_id))?;

            if let Some(available) = product.stock
                && available < item.quantity
            {
                return Err(OrderError::InsufficientStock {
                    product_name: product.name,
                    available,
                    requested: item.quantity,
                });
            }

            lines.push((product, item.quantity));
        }

        // Capture unit prices and total in exact decimal arithmetic
        let total = order_total(lines.iter().map(|(p, q)| (p.price, *q)));

        // Decrement tracked stock; the conditional guard cannot go negative
        for (product, quantity) in &lines {
            if !product.tracks_stock() {
                continue;
            }
            let decremented =
                ProductRepository::decrement_stock(&mut tx, product.id, *quantity).await?;
            if !decremented {
                return Err(OrderError::InsufficientStock {
                    product_name: product.name.clone(),
                    available: product.stock.unwrap_or(0),
                    requested: *quantity,
                });
            }
        }

        // Persist the order and its immutable line items
        let (order_id, _date) =
            OrderRepository::insert_order(&mut tx, user.id, total, &new_order.shipping).await?;
        for (product, quantity) in &lines {
            OrderRepository::insert_item(&mut tx, order_id, product.id, *quantity, product.price)
                .await?;
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        let order = self.fetch(order_id).await?;

        // Confirmation email is best-effort; the order already committed
        self.send_confirmation(user, &order);

        Ok(order)
    }

    /// Get one of the user's own orders.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::OrderNotFound` if the order doesn't exist or
    /// belongs to someone else; ownership is not revealed.
    pub async fn get_for_user(&self, user: &User, id: OrderId) -> Result<Order, OrderError> {
        let order = OrderRepository::new(self.pool)
            .get_with_items(id)
            .await?
            .filter(|order| order.user_id == user.id)
            .ok_or(OrderError::OrderNotFound)?;

        Ok(order)
    }

    /// List the user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_for_user(&self, user: &User) -> Result<Vec<Order>, OrderError> {
        Ok(OrderRepository::new(self.pool).list_for_user(user.id).await?)
    }

    /// List every order, newest first (admin overview).
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        Ok(OrderRepository::new(self.pool).list_all().await?)
    }

    /// Record carrier and tracking number, derive the tracking URL, and
    /// mark the order shipped.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::OrderNotFound` if the order doesn't exist.
    pub async fn update_tracking(
        &self,
        id: OrderId,
        company: &str,
        tracking_number: &str,
    ) -> Result<Order, OrderError> {
        let url = tracking_url_for(company, tracking_number);

        OrderRepository::new(self.pool)
            .set_tracking(id, company, tracking_number, url.as_deref())
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => OrderError::OrderNotFound,
                other => OrderError::Repository(other),
            })?;

        self.fetch(id).await
    }

    /// Mark an order delivered.
    ///
    /// Works from any current status; a lost shipping update must not
    /// block recording the delivery that actually happened.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::OrderNotFound` if the order doesn't exist.
    pub async fn mark_as_delivered(&self, id: OrderId) -> Result<Order, OrderError> {
        OrderRepository::new(self.pool)
            .set_delivered(id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => OrderError::OrderNotFound,
                other => OrderError::Repository(other),
            })?;

        self.fetch(id).await
    }

    async fn fetch(&self, id: OrderId) -> Result<Order, OrderError> {
        OrderRepository::new(self.pool)
            .get_with_items(id)
            .await?
            .ok_or(OrderError::OrderNotFound)
    }

    /// Spawn the confirmation email without holding up the response.
    fn send_confirmation(&self, user: &User, order: &Order) {
        let email = self.email.clone();
        let to = user.email.as_str().to_owned();
        let name = user.display_name().to_owned();
        let order = order.clone();

        tokio::spawn(async move {
            if let Err(e) = email.send_order_confirmation(&to, &name, &order).await {
                tracing::warn!(
                    order_id = %order.id,
                    error = %e,
                    "Failed to send order confirmation email"
                );
            }
        });
    }
}

/// Sort lines by product id and merge duplicates into one line.
///
/// Every transaction then acquires its row locks in the same order, so two
/// concurrent orders naming the same products cannot deadlock. Merging also
/// makes the stock check see the full requested quantity for a product at
/// once instead of line by line.
fn normalize_items(items: &[NewOrderItem]) -> Vec<NewOrderItem> {
    let mut items = items.to_vec();
    items.sort_by_key(|item| item.product_id);

    let mut merged: Vec<NewOrderItem> = Vec::with_capacity(items.len());
    for item in items {
        if let Some(last) = merged.last_mut()
            && last.product_id == item.product_id
        {
            last.quantity += item.quantity;
        } else {
            merged.push(item);
        }
    }
    merged
}

/// Validate quantities before opening a transaction.
fn validate_items(items: &[NewOrderItem]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::EmptyOrder);
    }

    for item in items {
        if item.quantity < 1 {
            return Err(OrderError::InvalidQuantity {
                product_id: item.product_id,
                quantity: item.quantity,
            });
        }
    }

    Ok(())
}

/// Exact decimal total over `(unit price, quantity)` lines.
fn order_total(lines: impl Iterator<Item = (Decimal, i32)>) -> Decimal {
    lines
        .map(|(price, quantity)| price * Decimal::from(quantity))
        .sum()
}

/// Per-carrier tracking URL. Unknown carriers get no URL; the tracking
/// number is still stored for manual lookup.
#[must_use]
pub fn tracking_url_for(company: &str, tracking_number: &str) -> Option<String> {
    if company.eq_ignore_ascii_case("interrapidisimo") {
        Some(format!(
            "https://www.interrapidisimo.com/rastreo/?guia={tracking_number}"
        ))
    } else if company.eq_ignore_ascii_case("servientrega") {
        Some(format!(
            "https://www.servientrega.com/wps/portal/rastreo-envio?guia={tracking_number}"
        ))
    } else {
        None
    }
}

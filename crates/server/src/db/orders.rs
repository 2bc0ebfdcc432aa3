//! Order repository.
//!
//! Order creation is transaction-scoped: the order service owns the
//! transaction (stock validation and decrement happen inside it too), so the
//! insert helpers here take a `PgConnection` rather than the pool.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use punto_y_lana_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    date: DateTime<Utc>,
    total_amount: Decimal,
    status: String,
    shipping_address: Option<String>,
    shipping_phone: Option<String>,
    notes: Option<String>,
    payment_method: Option<String>,
    shipping_company: Option<String>,
    tracking_number: Option<String>,
    tracking_url: Option<String>,
    shipped_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(|e| RepositoryError::corrupt("order status", e))?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            date: self.date,
            total_amount: self.total_amount,
            status,
            shipping_address: self.shipping_address,
            shipping_phone: self.shipping_phone,
            notes: self.notes,
            payment_method: self.payment_method,
            shipping_company: self.shipping_company,
            tracking_number: self.tracking_number,
            tracking_url: self.tracking_url,
            shipped_at: self.shipped_at,
            delivered_at: self.delivered_at,
            items,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    product_name: String,
    quantity: i32,
    price: Decimal,
}

const ORDER_COLUMNS: &str = "id, user_id, date, total_amount, status, shipping_address, \
     shipping_phone, notes, payment_method, shipping_company, tracking_number, tracking_url, \
     shipped_at, delivered_at";

/// Shipping details captured when an order is placed.
#[derive(Debug, Clone)]
pub struct ShippingInfo {
    pub address: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert the order header inside an open transaction.
    ///
    /// Returns the generated id and creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_order(
        conn: &mut PgConnection,
        user_id: UserId,
        total_amount: Decimal,
        shipping: &ShippingInfo,
    ) -> Result<(OrderId, DateTime<Utc>), RepositoryError> {
        let (id, date): (i64, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO orders
                 (user_id, total_amount, status, shipping_address, shipping_phone, notes, payment_method)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, date",
        )
        .bind(user_id)
        .bind(total_amount)
        .bind(OrderStatus::Pending.as_str())
        .bind(&shipping.address)
        .bind(&shipping.phone)
        .bind(&shipping.notes)
        .bind(&shipping.payment_method)
        .fetch_one(&mut *conn)
        .await?;

        Ok((OrderId::new(id), date))
    }

    /// Insert one line item inside an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_item(
        conn: &mut PgConnection,
        order_id: OrderId,
        product_id: ProductId,
        quantity: i32,
        price: Decimal,
    ) -> Result<OrderItemId, RepositoryError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO order_items (order_id, product_id, quantity, price)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(price)
        .fetch_one(&mut *conn)
        .await?;

        Ok(OrderItemId::new(id))
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_items(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut items = self.items_for(&[row.id]).await?;
        let items = items.remove(&row.id).unwrap_or_default();
        Ok(Some(row.into_order(items)?))
    }

    /// List a user's orders, newest first, with items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY date DESC");
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        self.assemble(rows).await
    }

    /// List every order, newest first, with items (admin overview).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY date DESC");
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .fetch_all(self.pool)
            .await?;

        self.assemble(rows).await
    }

    /// Record carrier/tracking details and mark the order shipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn set_tracking(
        &self,
        id: OrderId,
        company: &str,
        tracking_number: &str,
        tracking_url: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders
             SET shipping_company = $2, tracking_number = $3, tracking_url = $4,
                 status = $5, shipped_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(company)
        .bind(tracking_number)
        .bind(tracking_url)
        .bind(OrderStatus::Shipped.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Mark the order delivered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn set_delivered(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET status = $2, delivered_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(OrderStatus::Delivered.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Fetch items for a set of orders, keyed by order id. Product names are
    /// joined in for display and email summaries.
    async fn items_for(
        &self,
        order_ids: &[i64],
    ) -> Result<std::collections::HashMap<i64, Vec<OrderItem>>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name,
                    oi.quantity, oi.price
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             WHERE oi.order_id = ANY($1)
             ORDER BY oi.id",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: std::collections::HashMap<i64, Vec<OrderItem>> =
            std::collections::HashMap::new();
        for row in rows {
            by_order.entry(row.order_id).or_default().push(OrderItem {
                id: OrderItemId::new(row.id),
                product_id: ProductId::new(row.product_id),
                product_name: row.product_name,
                quantity: row.quantity,
                price: row.price,
            });
        }

        Ok(by_order)
    }

    async fn assemble(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut items = self.items_for(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect()
    }
}

//! Product repository for catalog database operations.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use punto_y_lana_core::{Category, ProductId};

use super::RepositoryError;
use crate::models::{Product, ProductDraft};

/// Row shape shared by every product query.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: Decimal,
    stock: Option<i32>,
    image_url: Option<String>,
    digital_url: Option<String>,
    category: String,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let category = self
            .category
            .parse::<Category>()
            .map_err(|e| RepositoryError::corrupt("category", e))?;

        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            image_url: self.image_url,
            digital_url: self.digital_url,
            category,
        })
    }
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock, image_url, digital_url, category";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (name, description, price, stock, image_url, digital_url, category)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, name, description, price, stock, image_url, digital_url, category",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(draft.stock)
        .bind(&draft.image_url)
        .bind(&draft.digital_url)
        .bind(draft.category.as_str())
        .fetch_one(self.pool)
        .await?;

        row.into_product()
    }

    /// List the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Update a product; returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "UPDATE products
             SET name = $2, description = $3, price = $4, stock = $5,
                 image_url = $6, digital_url = $7, category = $8
             WHERE id = $1
             RETURNING id, name, description, price, stock, image_url, digital_url, category",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(draft.stock)
        .bind(&draft.image_url)
        .bind(&draft.digital_url)
        .bind(draft.category.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// `true` if the product was deleted, `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive substring search on the product name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{}%", escape_like(query));
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name ILIKE $1 ORDER BY id"
        ))
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// List products in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_category(&self, category: Category) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY id"
        ))
        .bind(category.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Total number of products (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count.0)
    }

    // =========================================================================
    // Transaction-scoped helpers used by order placement
    // =========================================================================

    /// Fetch a product and lock its row for the rest of the transaction.
    ///
    /// The lock holds the stock value stable between validation and the
    /// decrement, so concurrent orders against the same product serialize.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Conditionally decrement tracked stock.
    ///
    /// The `stock >= $2` guard makes the decrement atomic: it returns `false`
    /// instead of ever driving stock negative, regardless of isolation level.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn decrement_stock(
        conn: &mut PgConnection,
        id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products
             SET stock = stock - $2
             WHERE id = $1 AND stock IS NOT NULL AND stock >= $2",
        )
        .bind(id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Escape `%` and `_` so user input matches literally inside ILIKE patterns.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

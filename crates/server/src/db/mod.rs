//! Database access for the Punto y Lana `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `users` - Registered customers and admins (unique email)
//! - `products` - Catalog (nullable `stock` means untracked/digital)
//! - `orders` / `order_items` - Orders with immutable line items
//! - `ai_designs` - Append-only generated designs
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/`, are embedded via
//! `sqlx::migrate!`, and run at startup.
//!
//! All queries use the runtime `query`/`query_as` API so the workspace builds
//! without a live database; row shapes are private to each repository and
//! converted into the validated [`crate::models`] types, with bad stored data
//! surfacing as [`RepositoryError::DataCorruption`].

pub mod designs;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use designs::DesignRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Wrap a stored-value parse failure as corruption.
    pub(crate) fn corrupt(what: &str, err: impl std::fmt::Display) -> Self {
        Self::DataCorruption(format!("invalid {what} in database: {err}"))
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

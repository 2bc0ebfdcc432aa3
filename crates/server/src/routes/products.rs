//! Public catalog routes.
//!
//! No authentication; this is the storefront browse surface.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use punto_y_lana_core::{Category, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Query string for product search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// List the whole catalog.
///
/// GET /api/v1/public/products
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Get one product.
///
/// GET /api/v1/public/products/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}

/// List products in a category.
///
/// GET /api/v1/public/products/category/{category}
///
/// An unknown category name is an empty result, not an error; the
/// storefront sends whatever the user clicked.
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let Some(category) = Category::parse_lenient(&category) else {
        return Ok(Json(Vec::new()));
    };

    let products = ProductRepository::new(state.pool())
        .by_category(category)
        .await?;

    Ok(Json(products))
}

/// Case-insensitive name search.
///
/// GET /api/v1/public/products/search?q=...
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).search(&query.q).await?;
    Ok(Json(products))
}

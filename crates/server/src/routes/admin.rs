//! Admin panel routes. Every handler requires the admin role.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use punto_y_lana_core::{OrderId, ProductId, UserId};

use crate::db::{ProductRepository, RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Order, Product, ProductDraft, User};
use crate::state::AppState;

// ==================== Products ====================

/// List all products.
///
/// GET /api/v1/admin/products
pub async fn list_products(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Create a product.
///
/// POST /api/v1/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool()).create(&draft).await?;

    tracing::info!(product_id = %product.id, admin_id = %admin.id, "Product created");
    Ok(Json(product))
}

/// Update a product.
///
/// PUT /api/v1/admin/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &draft)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}

/// Delete a product.
///
/// DELETE /api/v1/admin/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    tracing::info!(product_id = id, admin_id = %admin.id, "Product deleted");
    Ok(Json(json!({ "deleted": true })))
}

// ==================== Users ====================

/// List all users.
///
/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// Promote a user to admin.
///
/// POST /api/v1/admin/users/{id}/make-admin
pub async fn make_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    UserRepository::new(state.pool())
        .promote_to_admin(UserId::new(id))
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("user {id}")),
            other => AppError::Database(other),
        })?;

    tracing::info!(user_id = id, admin_id = %admin.id, "User promoted to admin");
    Ok(Json(json!({ "message": "user promoted to admin" })))
}

// ==================== Orders ====================

/// Tracking update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingRequest {
    pub shipping_company: String,
    pub tracking_number: String,
}

/// List every order, newest first.
///
/// GET /api/v1/admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Order>>> {
    let orders = state.orders().list_all().await?;
    Ok(Json(orders))
}

/// Record carrier and tracking number; marks the order shipped.
///
/// PUT /api/v1/admin/orders/{id}/tracking
pub async fn update_tracking(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(request): Json<TrackingRequest>,
) -> Result<Json<Order>> {
    let order = state
        .orders()
        .update_tracking(
            OrderId::new(id),
            &request.shipping_company,
            &request.tracking_number,
        )
        .await?;

    tracing::info!(
        order_id = id,
        admin_id = %admin.id,
        company = %request.shipping_company,
        "Tracking updated"
    );
    Ok(Json(order))
}

/// Mark an order delivered.
///
/// POST /api/v1/admin/orders/{id}/delivered
pub async fn mark_delivered(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    let order = state.orders().mark_as_delivered(OrderId::new(id)).await?;
    Ok(Json(order))
}

// ==================== Stats ====================

/// Dashboard counters.
///
/// GET /api/v1/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>> {
    let total_products = ProductRepository::new(state.pool()).count().await?;
    let total_users = UserRepository::new(state.pool()).count().await?;

    Ok(Json(json!({
        "totalProducts": total_products,
        "totalUsers": total_users,
    })))
}

//! Customer order routes. All require authentication.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use punto_y_lana_core::OrderId;

use crate::db::orders::ShippingInfo;
use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::Order;
use crate::services::{NewOrder, NewOrderItem};
use crate::state::AppState;

/// New order request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<NewOrderItem>,
    pub shipping_address: Option<String>,
    pub shipping_phone: Option<String>,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
}

impl From<OrderRequest> for NewOrder {
    fn from(request: OrderRequest) -> Self {
        Self {
            items: request.items,
            shipping: ShippingInfo {
                address: request.shipping_address,
                phone: request.shipping_phone,
                notes: request.notes,
                payment_method: request.payment_method,
            },
        }
    }
}

/// Place an order.
///
/// POST /api/v1/orders
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<OrderRequest>,
) -> Result<Json<Order>> {
    let order = state.orders().create_order(&user, request.into()).await?;

    tracing::info!(order_id = %order.id, user_id = %user.id, "Order placed");
    Ok(Json(order))
}

/// List the current user's orders, newest first.
///
/// GET /api/v1/orders
pub async fn list_mine(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<Order>>> {
    let orders = state.orders().list_for_user(&user).await?;
    Ok(Json(orders))
}

/// Get one of the current user's orders.
///
/// GET /api/v1/orders/{id}
pub async fn get_mine(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    let order = state.orders().get_for_user(&user, OrderId::new(id)).await?;
    Ok(Json(order))
}

//! Order route handlers for the storefront side.
//!
//! All of these operate on the calling account's own orders; admin-wide
//! access lives under `routes::admin`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use stride_core::OrderId;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::services::OrderService;
use crate::state::AppState;

/// `POST /orders`: checkout the cart into an order.
#[instrument(skip(user, state))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let orders = OrderService::new(state.pool());
    let order = orders.checkout(user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Order placed successfully", "order": order })),
    ))
}

/// `GET /orders`: the account's order history.
#[instrument(skip(user, state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderService::new(state.pool());
    Ok(Json(orders.list(user.id).await?))
}

/// `GET /orders/{id}`: one of the account's orders.
#[instrument(skip(user, state))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let orders = OrderService::new(state.pool());
    Ok(Json(orders.get(user.id, id).await?))
}

/// `PUT /orders/cancel/{order_id}`: cancel and restore stock.
#[instrument(skip(user, state))]
pub async fn cancel(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let orders = OrderService::new(state.pool());
    let order = orders.cancel(user.id, order_id).await?;

    Ok(Json(
        json!({ "message": "Order cancelled successfully", "order": order }),
    ))
}

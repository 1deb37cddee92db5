//! Admin order handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use stride_core::{OrderId, OrderStatus};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{AdminOrderView, OrderItem};
use crate::services::OrderService;
use crate::state::AppState;

/// Admin order edit payload; absent fields are left unchanged.
///
/// `status` must be one of the admin-settable statuses; `Cancelled` is
/// reserved for the cancellation flow, which also restores stock.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
    pub items: Option<Vec<OrderItem>>,
    pub total: Option<Decimal>,
}

/// `GET /admin/orders`: every order, joined with its account and with a
/// product summary resolved for each line.
#[instrument(skip_all)]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminOrderView>>> {
    let orders = OrderService::new(state.pool());
    Ok(Json(orders.list_all().await?))
}

/// `GET /admin/orders/{id}`: any order by id, in the same resolved shape
/// as the listing.
#[instrument(skip_all)]
pub async fn show(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<AdminOrderView>> {
    let orders = OrderService::new(state.pool());
    Ok(Json(orders.admin_get(id).await?))
}

/// `PUT /admin/orders/{id}`: edit status, items and/or total.
#[instrument(skip_all)]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<impl IntoResponse> {
    let status = match payload.status.as_deref() {
        Some(raw) => Some(parse_settable_status(raw)?),
        None => None,
    };

    let orders = OrderService::new(state.pool());
    let order = orders
        .admin_update(id, status, payload.items.as_deref(), payload.total)
        .await?;

    Ok(Json(json!({ "message": "Order updated", "order": order })))
}

/// `DELETE /admin/orders/{id}`: delete an order. Stock is untouched.
#[instrument(skip_all)]
pub async fn remove(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let orders = OrderService::new(state.pool());
    orders.admin_delete(id).await?;

    Ok(Json(json!({ "message": "Order deleted successfully" })))
}

/// Parse a status string, rejecting anything an admin may not set.
fn parse_settable_status(raw: &str) -> Result<OrderStatus> {
    raw.parse::<OrderStatus>()
        .ok()
        .filter(|status| status.is_admin_settable())
        .ok_or_else(|| AppError::BadRequest("Invalid status value".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settable_status_accepts_the_four() {
        for raw in ["Pending", "Processing", "Shipped", "Delivered"] {
            assert!(parse_settable_status(raw).is_ok(), "{raw} should parse");
        }
    }

    #[test]
    fn test_settable_status_rejects_cancelled_and_garbage() {
        assert!(parse_settable_status("Cancelled").is_err());
        assert!(parse_settable_status("pending").is_err());
        assert!(parse_settable_status("Refunded").is_err());
    }
}

//! Cart route handlers.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use stride_core::ProductId;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::CartView;
use crate::services::CartService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

fn default_quantity() -> u32 {
    1
}

/// Add-to-cart payload. Quantity defaults to one.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Absolute-quantity update for an existing cart line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: u32,
}

/// Line removal payload. The size picks out which line of the product.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
    pub size: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /cart`: the cart with product details resolved.
#[instrument(skip(user, state))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<CartView>> {
    let carts = CartService::new(state.pool());
    Ok(Json(carts.get_view(user.id).await?))
}

/// `POST /cart/add`: add a quantity of a product size.
#[instrument(skip(user, state))]
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<impl IntoResponse> {
    let carts = CartService::new(state.pool());
    let cart = carts
        .add_item(user.id, payload.product_id, &payload.size, payload.quantity)
        .await?;

    Ok(Json(json!({ "message": "Item added to cart", "cart": cart })))
}

/// `PUT /cart/update`: set a line's absolute quantity.
#[instrument(skip(user, state))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(payload): Json<UpdateCartRequest>,
) -> Result<impl IntoResponse> {
    let carts = CartService::new(state.pool());
    let cart = carts
        .update_item(user.id, payload.product_id, &payload.size, payload.quantity)
        .await?;

    Ok(Json(cart))
}

/// `POST /cart/remove`: drop a line. Removing an absent line is fine.
#[instrument(skip(user, state))]
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(payload): Json<RemoveFromCartRequest>,
) -> Result<impl IntoResponse> {
    let carts = CartService::new(state.pool());
    let cart = carts
        .remove_item(user.id, payload.product_id, &payload.size)
        .await?;

    Ok(Json(json!({ "message": "Item removed", "cart": cart })))
}

/// `DELETE /cart/clear`: delete the cart row entirely.
#[instrument(skip(user, state))]
pub async fn clear(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let carts = CartService::new(state.pool());
    carts.clear(user.id).await?;

    Ok(Json(json!({ "message": "Cart cleared" })))
}

//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use stride_core::CategoryId;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::Category;
use crate::services::CatalogService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Category creation payload.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Category update payload; absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /categories`: list all categories.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let catalog = CatalogService::new(state.pool());
    Ok(Json(catalog.list_categories().await?))
}

/// `GET /categories/{id}`: category detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>> {
    let catalog = CatalogService::new(state.pool());
    Ok(Json(catalog.get_category(id).await?))
}

/// `POST /categories`: create a category.
#[instrument(skip_all)]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse> {
    let catalog = CatalogService::new(state.pool());
    let category = catalog
        .create_category(&payload.name, payload.description.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Category created successfully", "category": category })),
    ))
}

/// `PUT /categories/{id}`: update name and/or description.
#[instrument(skip_all)]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse> {
    let catalog = CatalogService::new(state.pool());
    let category = catalog
        .update_category(id, payload.name.as_deref(), payload.description.as_deref())
        .await?;

    Ok(Json(
        json!({ "message": "Category updated successfully", "category": category }),
    ))
}

/// `DELETE /categories/{id}`: delete a category.
///
/// Products filed under the category are left pointing at the dangling
/// name; they stay listable.
#[instrument(skip_all)]
pub async fn remove(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<impl IntoResponse> {
    let catalog = CatalogService::new(state.pool());
    catalog.delete_category(id).await?;

    Ok(Json(json!({ "message": "Category deleted successfully" })))
}

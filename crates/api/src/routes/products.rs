//! Product route handlers.
//!
//! Admin product writes arrive as `multipart/form-data` so an image can
//! ride along with the fields. `sizes` is a JSON-encoded array of
//! `{"size": ..., "stock": ...}` objects inside its form field, the way
//! the admin frontend submits it.

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde_json::json;
use stride_core::{ProductId, SizeSet, SizeVariant};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{CreateProductInput, Product, UpdateProductInput};
use crate::services::{CatalogService, uploads};
use crate::state::AppState;

// =============================================================================
// Form Parsing
// =============================================================================

/// Raw fields of a product form, before validation.
#[derive(Debug, Default)]
struct ProductForm {
    name: Option<String>,
    description: Option<String>,
    price: Option<String>,
    category: Option<String>,
    sku: Option<String>,
    sizes: Option<String>,
    image: Option<(String, Bytes)>,
}

/// Drain a multipart stream into a [`ProductForm`].
///
/// Unknown fields are ignored; an image field without content counts as
/// absent.
async fn read_form(multipart: &mut Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid form data".to_string()))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        if name == "image" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| AppError::BadRequest("Invalid form data".to_string()))?;
            if !bytes.is_empty() {
                form.image = Some((file_name, bytes));
            }
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|_| AppError::BadRequest("Invalid form data".to_string()))?;

        match name.as_str() {
            "name" => form.name = Some(text),
            "description" => form.description = Some(text),
            "price" => form.price = Some(text),
            "category" => form.category = Some(text),
            "sku" => form.sku = Some(text),
            "sizes" => form.sizes = Some(text),
            _ => {}
        }
    }

    Ok(form)
}

/// Parse the `sizes` form field. An empty value clears the size list.
fn parse_sizes(raw: &str) -> Result<SizeSet> {
    if raw.is_empty() {
        return Ok(SizeSet::new(Vec::new()));
    }

    serde_json::from_str::<Vec<SizeVariant>>(raw)
        .map(SizeSet::new)
        .map_err(|_| AppError::BadRequest("Invalid sizes format".to_string()))
}

/// Parse the `price` form field.
fn parse_price(raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid price".to_string()))
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /products`: list all products.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let catalog = CatalogService::new(state.pool());
    Ok(Json(catalog.list_products().await?))
}

/// `GET /products/{id}`: product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let catalog = CatalogService::new(state.pool());
    Ok(Json(catalog.get_product(id).await?))
}

/// `POST /products`: create a product from a multipart form.
#[instrument(skip_all)]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = read_form(&mut multipart).await?;

    let name = form
        .name
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Name is required".to_string()))?;
    let description = form
        .description
        .ok_or_else(|| AppError::BadRequest("Description is required".to_string()))?;
    let price = parse_price(
        &form
            .price
            .ok_or_else(|| AppError::BadRequest("Price is required".to_string()))?,
    )?;
    let category = form
        .category
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Category is required".to_string()))?;
    let sizes = match form.sizes {
        Some(raw) => parse_sizes(&raw)?,
        None => SizeSet::new(Vec::new()),
    };

    let image = match form.image {
        Some((file_name, bytes)) => Some(
            uploads::save_upload(&state.config().uploads_dir, &file_name, &bytes).await?,
        ),
        None => None,
    };

    let catalog = CatalogService::new(state.pool());
    let product = catalog
        .create_product(CreateProductInput {
            name,
            description,
            price,
            category,
            image,
            sku: form.sku,
            sizes,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Product created successfully", "product": product })),
    ))
}

/// `PUT /products/{id}`: partial update from a multipart form.
///
/// Only fields present in the form change; the image is replaced only
/// when a new upload is attached.
#[instrument(skip_all)]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = read_form(&mut multipart).await?;

    let price = match form.price.filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_price(&raw)?),
        None => None,
    };
    let sizes = match form.sizes {
        Some(raw) => Some(parse_sizes(&raw)?),
        None => None,
    };

    let image = match form.image {
        Some((file_name, bytes)) => Some(
            uploads::save_upload(&state.config().uploads_dir, &file_name, &bytes).await?,
        ),
        None => None,
    };

    let catalog = CatalogService::new(state.pool());
    let product = catalog
        .update_product(
            id,
            UpdateProductInput {
                name: form.name,
                description: form.description,
                price,
                category: form.category,
                image,
                sku: form.sku,
                sizes,
            },
        )
        .await?;

    Ok(Json(
        json!({ "message": "Product updated successfully", "product": product }),
    ))
}

/// `DELETE /products/{id}`: hard delete.
#[instrument(skip_all)]
pub async fn remove(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let catalog = CatalogService::new(state.pool());
    catalog.delete_product(id).await?;

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

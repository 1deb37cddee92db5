//! Products and their per-size inventory.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use stride_core::{ProductId, SizeSet};

/// A product with per-size inventory.
///
/// `stock` and `in_stock` are derived from `sizes` on every write, never
/// set directly. `version` is a write counter used to detect concurrent
/// stock changes; it is internal and omitted from responses.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image: Option<String>,
    pub sku: String,
    pub sizes: SizeSet,
    pub stock: u32,
    pub in_stock: bool,
    #[serde(skip_serializing)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a product.
///
/// `sku` is optional; when absent the catalog service generates one.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image: Option<String>,
    pub sku: Option<String>,
    pub sizes: SizeSet,
}

/// Partial update for a product; `None` fields are left unchanged.
///
/// Supplying `sizes` replaces the whole size list and re-derives the
/// stock aggregates.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub sku: Option<String>,
    pub sizes: Option<SizeSet>,
}

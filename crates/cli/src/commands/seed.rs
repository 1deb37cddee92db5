//! Seed the catalog from a YAML file.
//!
//! Reads categories and products from YAML and inserts them through the
//! catalog service, so seeded rows go through the same validation and
//! stock derivation as API writes. Re-running is safe: rows that already
//! exist (by category name or product SKU) are skipped.
//!
//! # File Format
//!
//! ```yaml
//! categories:
//!   - name: Running
//!     description: Road and trail running shoes
//! products:
//!   - name: Glide 3
//!     description: Neutral daily trainer
//!     price: "129.99"   # quoted; prices are decimal strings
//!     category: Running
//!     sku: RUN-GLIDE3
//!     sizes:
//!       - { size: "9", stock: 10 }
//!       - { size: "10", stock: 4 }
//! ```
//!
//! # Environment Variables
//!
//! - `STRIDE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{error, info};

use stride_api::db::RepositoryError;
use stride_api::error::AppError;
use stride_api::models::CreateProductInput;
use stride_api::services::CatalogService;
use stride_core::{SizeSet, SizeVariant};

/// Top-level structure of a catalog seed file.
#[derive(Debug, Deserialize)]
pub struct CatalogSeed {
    /// Categories to create, in order.
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
    /// Products to create, in order. Categories must already exist (either
    /// above or in the database).
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// One category entry.
#[derive(Debug, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One product entry. The SKU is required so re-runs can detect rows that
/// were already seeded.
#[derive(Debug, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    pub sku: String,
    pub sizes: Vec<SizeVariant>,
}

impl ProductSeed {
    fn into_input(self) -> CreateProductInput {
        CreateProductInput {
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image: self.image,
            sku: Some(self.sku),
            sizes: SizeSet::new(self.sizes),
        }
    }
}

/// Check a parsed seed file for mistakes worth stopping on.
fn validate(seed: &CatalogSeed) -> Vec<String> {
    let mut errors = Vec::new();

    let mut category_names = HashSet::new();
    for category in &seed.categories {
        if category.name.trim().is_empty() {
            errors.push("category with empty name".to_owned());
        }
        if !category_names.insert(category.name.as_str()) {
            errors.push(format!("duplicate category name: {}", category.name));
        }
    }

    let mut skus = HashSet::new();
    for product in &seed.products {
        if product.name.trim().is_empty() {
            errors.push("product with empty name".to_owned());
        }
        if product.sku.trim().is_empty() {
            errors.push(format!("product {} has an empty SKU", product.name));
        }
        if !skus.insert(product.sku.as_str()) {
            errors.push(format!("duplicate SKU: {}", product.sku));
        }
        if product.sizes.is_empty() {
            errors.push(format!(
                "product {} has no sizes (use stock: 0 for an out-of-stock size)",
                product.name
            ));
        }
    }

    errors
}

/// Seed categories and products from a YAML file.
///
/// # Errors
///
/// Returns an error if the environment is incomplete, the file is missing
/// or malformed, validation fails, or a database write fails for a reason
/// other than "already exists".
pub async fn catalog(
    file_path: &str,
    clear_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url =
        super::database_url().ok_or("STRIDE_DATABASE_URL (or DATABASE_URL) not set")?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog seed from file");

    // Read and validate the YAML before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let seed: CatalogSeed = serde_yaml::from_str(&content)?;

    info!(
        categories = seed.categories.len(),
        products = seed.products.len(),
        "Parsed seed file"
    );

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = PgPool::connect(database_url.expose_secret()).await?;
    info!("Connected to database");

    if clear_existing {
        info!("Clearing existing catalog");
        sqlx::query("DELETE FROM shop.product").execute(&pool).await?;
        sqlx::query("DELETE FROM shop.category")
            .execute(&pool)
            .await?;
    }

    let service = CatalogService::new(&pool);

    let mut created_categories = 0_usize;
    let mut skipped_categories = 0_usize;
    for category in &seed.categories {
        match service
            .create_category(&category.name, category.description.as_deref())
            .await
        {
            Ok(_) => created_categories += 1,
            Err(AppError::Database(RepositoryError::Conflict(_))) => skipped_categories += 1,
            Err(e) => {
                error!("Failed to seed category {}: {e}", category.name);
                return Err(e.into());
            }
        }
    }

    let mut created_products = 0_usize;
    let mut skipped_products = 0_usize;
    for product in seed.products {
        let name = product.name.clone();
        match service.create_product(product.into_input()).await {
            Ok(_) => created_products += 1,
            Err(AppError::Database(RepositoryError::Conflict(_))) => skipped_products += 1,
            Err(e) => {
                error!("Failed to seed product {name}: {e}");
                return Err(e.into());
            }
        }
    }

    info!("Seeding complete!");
    info!("  Categories created: {created_categories} (skipped {skipped_categories})");
    info!("  Products created: {created_products} (skipped {skipped_products})");

    Ok(())
}

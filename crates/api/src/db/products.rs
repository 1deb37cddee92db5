//! Product storage.
//!
//! Each product row carries its size variants as a JSONB document plus
//! the derived `stock` and `in_stock` aggregates. The aggregates are
//! recomputed from the variant list on every write that touches it, never
//! written independently. `version` counts those writes and backs the
//! compare-and-swap in [`ProductRepository::update_stock_guarded`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use stride_core::{ProductId, SizeSet};
use tracing::instrument;

use crate::db::RepositoryError;
use crate::models::{CreateProductInput, Product, UpdateProductInput};

/// Row shape for `shop.product`.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    price: Decimal,
    category: String,
    image: Option<String>,
    sku: String,
    sizes: Json<SizeSet>,
    stock: i64,
    in_stock: bool,
    version: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let stock = u32::try_from(row.stock).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "product {} has negative stock {}",
                row.id, row.stock
            ))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            image: row.image,
            sku: row.sku,
            sizes: row.sizes.0,
            stock,
            in_stock: row.in_stock,
            version: row.version,
            created_at: row.created_at,
        })
    }
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, category, image, sku, sizes, stock, in_stock, version, created_at";

/// Repository for product records.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new repository backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Fetch a product by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Fetch several products by id in one round trip.
    ///
    /// Missing ids are simply absent from the result; order is not
    /// guaranteed to match the input.
    #[instrument(skip(self, ids))]
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = ANY($1)"
        ))
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Insert a product with the given resolved SKU.
    ///
    /// The caller validates the category and resolves the SKU; this
    /// method derives `stock` and `in_stock` from the size list.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] when the SKU is taken.
    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: &CreateProductInput,
        sku: &str,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO shop.product
                (name, description, price, category, image, sku, sizes, stock, in_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PRODUCT_COLUMNS}
            ",
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.category)
        .bind(input.image.as_deref())
        .bind(sku)
        .bind(Json(&input.sizes))
        .bind(i64::from(input.sizes.total_stock()))
        .bind(input.sizes.in_stock())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                RepositoryError::Conflict(format!("A product with SKU '{sku}' already exists"))
            } else {
                RepositoryError::Database(e)
            }
        })?;

        row.try_into()
    }

    /// Apply a partial update, returning the updated product.
    ///
    /// Absent fields are left unchanged. Supplying `sizes` replaces the
    /// variant list, re-derives the aggregates and bumps `version`.
    /// Returns `None` when no product has the given id.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: ProductId,
        input: &UpdateProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        let sizes = input.sizes.as_ref().map(Json);
        let stock = input.sizes.as_ref().map(|s| i64::from(s.total_stock()));
        let in_stock = input.sizes.as_ref().map(SizeSet::in_stock);

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE shop.product
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                category = COALESCE($5, category),
                image = COALESCE($6, image),
                sku = COALESCE($7, sku),
                sizes = COALESCE($8, sizes),
                stock = COALESCE($9, stock),
                in_stock = COALESCE($10, in_stock),
                version = CASE WHEN $8 IS NULL THEN version ELSE version + 1 END
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            ",
        ))
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.description.as_deref())
        .bind(input.price)
        .bind(input.category.as_deref())
        .bind(input.image.as_deref())
        .bind(input.sku.as_deref())
        .bind(sizes)
        .bind(stock)
        .bind(in_stock)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                RepositoryError::Conflict("A product with that SKU already exists".to_string())
            } else {
                RepositoryError::Database(e)
            }
        })?;

        row.map(TryInto::try_into).transpose()
    }

    /// Replace a product's size list only if `expected_version` still
    /// matches, re-deriving the aggregates.
    ///
    /// Returns `false` when the product vanished or another writer got
    /// there first; the caller re-reads and retries.
    #[instrument(skip(self, sizes))]
    pub async fn update_stock_guarded(
        &self,
        id: ProductId,
        expected_version: i64,
        sizes: &SizeSet,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop.product
            SET sizes = $3, stock = $4, in_stock = $5, version = version + 1
            WHERE id = $1 AND version = $2
            ",
        )
        .bind(id)
        .bind(expected_version)
        .bind(Json(sizes))
        .bind(i64::from(sizes.total_stock()))
        .bind(sizes.in_stock())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Delete a product, returning whether a row was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

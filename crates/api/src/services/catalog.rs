//! Catalog service: categories and products.
//!
//! Products reference their category by name. Creating or re-homing a
//! product validates that name against the category store and stores the
//! canonical spelling.

use chrono::Utc;
use rand::Rng;
use sqlx::PgPool;
use stride_core::{CategoryId, ProductId};

use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::{Category, CreateProductInput, Product, UpdateProductInput};

/// Catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    categories: CategoryRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            categories: CategoryRepository::new(pool),
        }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.list().await?)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no product has the given id.
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        self.products
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    /// Create a product.
    ///
    /// The category name must match an existing category; the stored name
    /// is the category's canonical spelling. When no SKU is supplied one
    /// is generated.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for an unknown category and `Conflict` for a
    /// duplicate SKU.
    pub async fn create_product(&self, mut input: CreateProductInput) -> Result<Product> {
        let category = self
            .categories
            .find_by_name(&input.category)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid category name".to_string()))?;
        input.category = category.name;

        let sku = match input.sku.take().filter(|s| !s.is_empty()) {
            Some(sku) => sku,
            None => generate_sku(),
        };

        Ok(self.products.create(&input, &sku).await?)
    }

    /// Apply a partial update to a product.
    ///
    /// A supplied category is re-validated against the category store; an
    /// empty category or SKU string is treated as "not supplied", which
    /// is how form submissions express leaving a field alone.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no product has the given id and
    /// `BadRequest` for an unknown category.
    pub async fn update_product(
        &self,
        id: ProductId,
        mut input: UpdateProductInput,
    ) -> Result<Product> {
        input.category = input.category.filter(|c| !c.is_empty());
        input.sku = input.sku.filter(|s| !s.is_empty());

        if let Some(ref name) = input.category {
            let category = self
                .categories
                .find_by_name(name)
                .await?
                .ok_or_else(|| AppError::BadRequest("Invalid category name".to_string()))?;
            input.category = Some(category.name);
        }

        self.products
            .update(id, &input)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no product has the given id.
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        if !self.products.delete(id).await? {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.list().await?)
    }

    /// Fetch one category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no category has the given id.
    pub async fn get_category(&self, id: CategoryId) -> Result<Category> {
        self.categories
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for a blank name and `Conflict` for a
    /// duplicate one.
    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Category name is required".to_string()));
        }

        Ok(self.categories.create(name, description).await?)
    }

    /// Update a category's name and/or description.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no category has the given id.
    pub async fn update_category(
        &self,
        id: CategoryId,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Category> {
        self.categories
            .update(id, name, description)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    /// Delete a category.
    ///
    /// Products filed under it keep the now-dangling name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no category has the given id.
    pub async fn delete_category(&self, id: CategoryId) -> Result<()> {
        if !self.categories.delete(id).await? {
            return Err(AppError::NotFound("Category not found".to_string()));
        }

        Ok(())
    }
}

/// Generate a SKU from the current time and a random suffix.
///
/// Uniqueness is not guaranteed, only made overwhelmingly likely; the
/// unique index on the column catches the rest.
fn generate_sku() -> String {
    let suffix = rand::rng().random_range(0..10_000);
    format!("SKU-{}-{suffix}", Utc::now().timestamp_millis())
}

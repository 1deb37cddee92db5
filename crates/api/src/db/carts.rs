//! Cart storage.
//!
//! One row per account, line items as a JSONB document. Writes replace
//! the whole item list, so a cart mutation is a single-row upsert and
//! needs no transaction.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use stride_core::{AccountId, CartId};
use tracing::instrument;

use crate::db::RepositoryError;
use crate::models::{Cart, CartItem};

/// Row shape for `shop.cart`.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: CartId,
    account_id: AccountId,
    items: Json<Vec<CartItem>>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            account_id: row.account_id,
            items: row.items.0,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for cart records.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new repository backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the cart for an account, if one exists.
    #[instrument(skip(self))]
    pub async fn get_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, account_id, items, updated_at
            FROM shop.cart
            WHERE account_id = $1
            ",
        )
        .bind(account_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Replace the account's cart items, creating the cart row if absent.
    #[instrument(skip(self, items))]
    pub async fn upsert_items(
        &self,
        account_id: AccountId,
        items: &[CartItem],
    ) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO shop.cart (account_id, items)
            VALUES ($1, $2)
            ON CONFLICT (account_id)
            DO UPDATE SET items = EXCLUDED.items, updated_at = NOW()
            RETURNING id, account_id, items, updated_at
            ",
        )
        .bind(account_id)
        .bind(Json(items))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Delete the account's cart row, returning whether one existed.
    #[instrument(skip(self))]
    pub async fn delete_by_account(&self, account_id: AccountId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.cart WHERE account_id = $1")
            .bind(account_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! Order storage.
//!
//! Orders are append-mostly: placed once, then touched only by status
//! changes and admin edits. Line items ride along as JSONB.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use stride_core::{AccountId, Email, OrderId, OrderStatus};
use tracing::instrument;

use crate::db::RepositoryError;
use crate::models::{Order, OrderItem, OrderWithAccount};

/// Row shape for `shop.orders`.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    account_id: AccountId,
    items: Json<Vec<OrderItem>>,
    total: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            account_id: row.account_id,
            items: row.items.0,
            total: row.total,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Row shape for an order joined with its account.
#[derive(Debug, sqlx::FromRow)]
struct OrderWithAccountRow {
    id: OrderId,
    account_id: AccountId,
    account_name: String,
    account_email: Email,
    items: Json<Vec<OrderItem>>,
    total: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl From<OrderWithAccountRow> for OrderWithAccount {
    fn from(row: OrderWithAccountRow) -> Self {
        Self {
            id: row.id,
            account_id: row.account_id,
            account_name: row.account_name,
            account_email: row.account_email,
            items: row.items.0,
            total: row.total,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Repository for order records.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new repository backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new order and empty the account's cart, atomically.
    ///
    /// The cart row survives with an empty item list; only an explicit
    /// clear deletes it. Stock has already been debited by the caller.
    #[instrument(skip(self, items))]
    pub async fn place(
        &self,
        account_id: AccountId,
        items: &[OrderItem],
        total: Decimal,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO shop.orders (account_id, items, total)
            VALUES ($1, $2, $3)
            RETURNING id, account_id, items, total, status, created_at
            ",
        )
        .bind(account_id)
        .bind(Json(items))
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r"
            UPDATE shop.cart
            SET items = '[]'::jsonb, updated_at = NOW()
            WHERE account_id = $1
            ",
        )
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// List an account's orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, account_id, items, total, status, created_at
            FROM shop.orders
            WHERE account_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(account_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Fetch an order only if it belongs to the given account.
    #[instrument(skip(self))]
    pub async fn get_for_account(
        &self,
        id: OrderId,
        account_id: AccountId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, account_id, items, total, status, created_at
            FROM shop.orders
            WHERE id = $1 AND account_id = $2
            ",
        )
        .bind(id)
        .bind(account_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Fetch an order by id regardless of owner.
    #[instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, account_id, items, total, status, created_at
            FROM shop.orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Fetch an order with its account, regardless of owner.
    #[instrument(skip(self))]
    pub async fn get_with_account(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithAccount>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderWithAccountRow>(
            r"
            SELECT o.id, o.account_id, a.name AS account_name, a.email AS account_email,
                   o.items, o.total, o.status, o.created_at
            FROM shop.orders o
            JOIN shop.account a ON a.id = o.account_id
            WHERE o.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List every order with its account, newest first.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<OrderWithAccount>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderWithAccountRow>(
            r"
            SELECT o.id, o.account_id, a.name AS account_name, a.email AS account_email,
                   o.items, o.total, o.status, o.created_at
            FROM shop.orders o
            JOIN shop.account a ON a.id = o.account_id
            ORDER BY o.created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Apply an admin edit: any combination of status, items and total.
    ///
    /// Absent fields are left unchanged. Stock is deliberately not
    /// touched; admin edits are trusted. Returns `None` when no order has
    /// the given id.
    #[instrument(skip(self, items))]
    pub async fn update(
        &self,
        id: OrderId,
        status: Option<OrderStatus>,
        items: Option<&[OrderItem]>,
        total: Option<Decimal>,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE shop.orders
            SET status = COALESCE($2, status),
                items = COALESCE($3, items),
                total = COALESCE($4, total)
            WHERE id = $1
            RETURNING id, account_id, items, total, status, created_at
            ",
        )
        .bind(id)
        .bind(status)
        .bind(items.map(Json))
        .bind(total)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Move an order to `Cancelled` if it is not there already.
    ///
    /// Returns whether this call made the transition. Concurrent cancels
    /// race on this update; exactly one of them sees `true` and goes on
    /// to restore stock.
    #[instrument(skip(self))]
    pub async fn mark_cancelled(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop.orders
            SET status = 'cancelled'
            WHERE id = $1 AND status <> 'cancelled'
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Delete an order, returning whether a row was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

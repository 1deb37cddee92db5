//! Account storage.
//!
//! Accounts and their password hashes live in separate tables
//! (`shop.account` and `shop.account_password`); the hash only ever
//! crosses this boundary for credential verification and never appears in
//! the [`Account`] model.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use stride_core::{AccountId, AccountRole, Email};
use tracing::instrument;

use crate::db::RepositoryError;
use crate::models::Account;

/// Row shape for `shop.account`.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: AccountId,
    name: String,
    email: Email,
    role: AccountRole,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Row shape for an account joined with its password hash.
#[derive(Debug, sqlx::FromRow)]
struct AccountWithHashRow {
    id: AccountId,
    name: String,
    email: Email,
    role: AccountRole,
    is_active: bool,
    created_at: DateTime<Utc>,
    password_hash: String,
}

impl From<AccountWithHashRow> for (Account, String) {
    fn from(row: AccountWithHashRow) -> Self {
        (
            Account {
                id: row.id,
                name: row.name,
                email: row.email,
                role: row.role,
                is_active: row.is_active,
                created_at: row.created_at,
            },
            row.password_hash,
        )
    }
}

/// Repository for account records.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new repository backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an account and its password hash in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] when the email is already
    /// registered.
    #[instrument(skip(self, password_hash))]
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        role: AccountRole,
    ) -> Result<Account, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, AccountRow>(
            r"
            INSERT INTO shop.account (name, email, role)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, role, is_active, created_at
            ",
        )
        .bind(name)
        .bind(email)
        .bind(role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                RepositoryError::Conflict("An account with this email already exists".to_string())
            } else {
                RepositoryError::Database(e)
            }
        })?;

        sqlx::query(
            r"
            INSERT INTO shop.account_password (account_id, password_hash)
            VALUES ($1, $2)
            ",
        )
        .bind(row.id)
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Look up an account by email, together with its password hash.
    #[instrument(skip(self))]
    pub async fn find_by_email_with_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountWithHashRow>(
            r"
            SELECT a.id, a.name, a.email, a.role, a.is_active, a.created_at,
                   p.password_hash
            FROM shop.account a
            JOIN shop.account_password p ON p.account_id = a.id
            WHERE a.email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Fetch an account by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, name, email, role, is_active, created_at
            FROM shop.account
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List all accounts, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, name, email, role, is_active, created_at
            FROM shop.account
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Flip an account's active flag, returning the updated account.
    ///
    /// Returns `None` when no account has the given id.
    #[instrument(skip(self))]
    pub async fn toggle_active(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            UPDATE shop.account
            SET is_active = NOT is_active
            WHERE id = $1
            RETURNING id, name, email, role, is_active, created_at
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}

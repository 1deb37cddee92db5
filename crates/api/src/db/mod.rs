//! Database access layer.
//!
//! Repositories own the SQL for one aggregate each and translate rows into
//! the domain types from `stride-core`. Handlers never touch `sqlx`
//! directly.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use thiserror::Error;

use crate::config::ApiConfig;

pub mod accounts;
pub mod carts;
pub mod categories;
pub mod orders;
pub mod products;

pub use accounts::AccountRepository;
pub use carts::CartRepository;
pub use categories::CategoryRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is in an invalid state.
    #[error("Data corruption: {0}")]
    DataCorruption(String),

    /// Entity not found.
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation.
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Create a PostgreSQL connection pool from the application config.
pub async fn create_pool(config: &ApiConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(config.database_url.expose_secret())
        .await
}

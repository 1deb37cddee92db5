//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! stride admin create -e admin@example.com -n "Admin Name" -p "a strong password"
//! ```
//!
//! # Environment Variables
//!
//! - `STRIDE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! The HTTP endpoint for creating admins requires an authenticated admin
//! session, so the first admin of a fresh deployment is created here.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use stride_api::services::auth::{AuthError, AuthService};

/// Errors that can occur during admin account operations.
#[derive(Debug, Error)]
pub enum AdminCommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Account creation failed (duplicate email, weak password, ...).
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a new admin account.
///
/// Validates the email and password with the same rules the API applies,
/// hashes the password, and inserts the account with the admin role.
///
/// # Errors
///
/// Returns an error if the environment is incomplete, the database is
/// unreachable, the email is taken, or the password is too weak.
///
/// # Returns
///
/// The ID of the created account.
pub async fn create(email: &str, name: &str, password: &str) -> Result<i32, AdminCommandError> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url()
        .ok_or(AdminCommandError::MissingEnvVar("STRIDE_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Creating admin account: {email}");
    let account = AuthService::new(&pool)
        .create_admin(name, email, password)
        .await?;

    tracing::info!(
        "Admin account created successfully! ID: {}, Email: {}",
        account.id,
        account.email
    );

    Ok(account.id.as_i32())
}

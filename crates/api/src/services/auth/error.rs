//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] stride_core::EmailError),

    /// Wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account with that email.
    #[error("account not found")]
    AccountNotFound,

    /// No admin account with that email.
    #[error("admin account not found")]
    AdminNotFound,

    /// Account exists but has been deactivated.
    #[error("account is inactive")]
    AccountInactive,

    /// Admin account exists but has been deactivated.
    #[error("admin account is inactive")]
    AdminInactive,

    /// Email already registered.
    #[error("account already exists")]
    AccountExists,

    /// Email already registered (admin creation path).
    #[error("admin account already exists")]
    AdminExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

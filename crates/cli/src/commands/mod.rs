//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Resolve the database URL, accepting the generic `DATABASE_URL` too.
///
/// `STRIDE_DATABASE_URL` wins when both are set; the fallback exists for
/// tooling that only knows the conventional name.
pub(crate) fn database_url() -> Option<SecretString> {
    pick_database_url(
        std::env::var("STRIDE_DATABASE_URL").ok(),
        std::env::var("DATABASE_URL").ok(),
    )
}

fn pick_database_url(primary: Option<String>, fallback: Option<String>) -> Option<SecretString> {
    primary.or(fallback).map(SecretString::from)
}

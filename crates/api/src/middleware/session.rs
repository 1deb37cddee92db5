//! tower-sessions layer backed by `PostgreSQL`.
//!
//! The session cookie is the sole authentication signal; everything
//! else about a request is stateless.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer, cookie::SameSite};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::{ApiConfig, CookieSameSite};

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "stride_session";

/// Sessions expire after a week of inactivity.
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Build the session layer over a `PostgreSQL` store.
///
/// Runs the store's own migration, which creates the session table on
/// first start.
///
/// # Errors
///
/// Returns an error when the session table migration fails.
pub async fn create_session_layer(
    pool: &PgPool,
    config: &ApiConfig,
) -> Result<SessionManagerLayer<PostgresStore>, sqlx::Error> {
    let store = PostgresStore::new(pool.clone());
    store.migrate().await?;

    let same_site = match config.cookie_same_site {
        CookieSameSite::Lax => SameSite::Lax,
        CookieSameSite::Strict => SameSite::Strict,
        CookieSameSite::None => SameSite::None,
    };

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(same_site)
        .with_http_only(true)
        .with_path("/"))
}

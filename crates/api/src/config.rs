//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STRIDE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `STRIDE_HOST` - Bind address (default: 127.0.0.1)
//! - `STRIDE_PORT` - Listen port (default: 5000)
//! - `STRIDE_BASE_URL` - Public URL the API is served from (default: `http://localhost:5000`);
//!   an `https` scheme turns on the Secure cookie attribute
//! - `STRIDE_ALLOWED_ORIGINS` - Comma-separated CORS allowlist (default: empty, same-origin only)
//! - `STRIDE_COOKIE_SAME_SITE` - Session cookie `SameSite` policy: `lax`, `strict`, or `none`
//!   (default: lax; cross-site frontends need `none` plus an https base URL)
//! - `STRIDE_UPLOADS_DIR` - Directory for product images (default: `uploads`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Sentry event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Failures while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Session cookie `SameSite` policy.
///
/// Kept as its own enum so config parsing stays independent of the cookie
/// library; the session middleware converts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookieSameSite {
    /// Sent on same-site requests and top-level navigations.
    #[default]
    Lax,
    /// Sent on same-site requests only.
    Strict,
    /// Sent cross-site; requires the Secure attribute.
    None,
}

impl std::str::FromStr for CookieSameSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lax" => Ok(Self::Lax),
            "strict" => Ok(Self::Strict),
            "none" => Ok(Self::None),
            _ => Err(format!("expected lax, strict, or none (got {s})")),
        }
    }
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` connection URL; treated as a secret, it embeds the password
    pub database_url: SecretString,
    /// Bind address for the listener
    pub host: IpAddr,
    /// Listen port
    pub port: u16,
    /// Public base URL for the API; `https` turns on Secure cookies
    pub base_url: String,
    /// CORS allowlist; empty means no cross-origin access
    pub allowed_origins: Vec<String>,
    /// Session cookie `SameSite` policy
    pub cookie_same_site: CookieSameSite,
    /// Directory product images are written to and served from
    pub uploads_dir: PathBuf,
    /// Sentry DSN; error tracking is off when unset
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Sentry event sample rate
    pub sentry_sample_rate: f32,
    /// Sentry tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

impl ApiConfig {
    /// Assemble the configuration from the environment.
    ///
    /// Reads `.env` first when one is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; env vars may come from the shell
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STRIDE_DATABASE_URL")?;
        let host = get_env_or_default("STRIDE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STRIDE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("STRIDE_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STRIDE_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("STRIDE_BASE_URL", "http://localhost:5000");
        let allowed_origins = split_origins(&get_env_or_default("STRIDE_ALLOWED_ORIGINS", ""));
        let cookie_same_site = get_env_or_default("STRIDE_COOKIE_SAME_SITE", "lax")
            .parse::<CookieSameSite>()
            .map_err(|e| ConfigError::InvalidEnvVar("STRIDE_COOKIE_SAME_SITE".to_string(), e))?;
        let uploads_dir = PathBuf::from(get_env_or_default("STRIDE_UPLOADS_DIR", "uploads"));

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_rate("SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_rate("SENTRY_TRACES_SAMPLE_RATE", 0.1)?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            allowed_origins,
            cookie_same_site,
            uploads_dir,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// The address the server binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the API is served over HTTPS (controls the Secure cookie attribute).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Resolve the database URL, accepting the generic `DATABASE_URL` too.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Read an environment variable that may be absent.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Read an environment variable, falling back to a default.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated origin list, dropping empty entries.
fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse an optional sample-rate variable, falling back to a default.
fn parse_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ApiConfig {
        ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            allowed_origins: Vec::new(),
            cookie_same_site: CookieSameSite::Lax,
            uploads_dir: PathBuf::from("uploads"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = test_config();
        assert!(!config.is_secure());

        config.base_url = "https://shop.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_split_origins() {
        assert!(split_origins("").is_empty());
        assert_eq!(
            split_origins("http://localhost:3000, https://shop.example.com,"),
            vec![
                "http://localhost:3000".to_string(),
                "https://shop.example.com".to_string()
            ]
        );
    }

    #[test]
    fn test_same_site_parsing() {
        assert_eq!("lax".parse::<CookieSameSite>().unwrap(), CookieSameSite::Lax);
        assert_eq!(
            "Strict".parse::<CookieSameSite>().unwrap(),
            CookieSameSite::Strict
        );
        assert_eq!(
            "NONE".parse::<CookieSameSite>().unwrap(),
            CookieSameSite::None
        );
        assert!("cross-site".parse::<CookieSameSite>().is_err());
    }
}

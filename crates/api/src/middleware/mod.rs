//! Session layer and auth extractors.

pub mod auth;
pub mod session;

pub use auth::{RequireAdmin, RequireAuth};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};

//! Business logic services.
//!
//! Services sit between the route handlers and the repositories: they own
//! validation, stock arithmetic and the retry loops around guarded
//! writes. Handlers stay thin.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod uploads;

pub use auth::AuthService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use orders::OrderService;

//! Core types for Stride.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod sizes;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use sizes::{SizeSet, SizeVariant, StockError};
pub use status::{AccountRole, OrderStatus};

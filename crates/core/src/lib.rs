//! Stride Core - Shared types library.
//!
//! This crate provides common types used across all Stride components:
//! - `api` - Storefront and admin HTTP server
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, emails, roles, order statuses, and per-size stock

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

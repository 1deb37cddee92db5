//! Admin route handlers.
//!
//! Everything here requires an admin session. Admin edits trust the
//! caller: order mutations do not re-validate stock.

pub mod orders;
pub mod users;

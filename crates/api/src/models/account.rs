//! Customer and admin accounts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use stride_core::{AccountId, AccountRole, Email};

/// An account as exposed over the API.
///
/// The password hash lives in a separate table and never leaves the
/// database layer; this struct is safe to serialize in any response.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: Email,
    pub role: AccountRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Whether this account may sign in and place orders.
    #[must_use]
    pub const fn can_authenticate(&self) -> bool {
        self.is_active
    }
}

//! Session claims.

use serde::{Deserialize, Serialize};
use stride_core::{AccountId, AccountRole, Email};

use crate::models::Account;

/// The signed-in account, as stored in the session.
///
/// This is a snapshot taken at login: deactivating an account or changing
/// its role does not rewrite live sessions, so the claims stay as they
/// were until the session expires or the account logs in again. Checks
/// that must see current account state (and there are none today) have to
/// re-read the account row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: AccountId,
    pub name: String,
    pub email: Email,
    pub role: AccountRole,
}

impl CurrentUser {
    /// Whether the session belongs to an admin account.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&Account> for CurrentUser {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
        }
    }
}

/// Session storage keys.
pub mod keys {
    /// Key under which [`super::CurrentUser`] is stored.
    pub const CURRENT_USER: &str = "current_user";
}

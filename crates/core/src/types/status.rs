//! Role and status enums for accounts and orders.

use serde::{Deserialize, Serialize};

/// Account role, the sole authorization signal.
///
/// The role is cached in the session at login time and is not re-read from
/// the account store on every request, so a role change takes effect on the
/// account's next login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.account_role", rename_all = "lowercase")
)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Ordinary shopper: cart, checkout, own orders.
    #[default]
    Customer,
    /// Store staff: catalog, category, order, and account administration.
    Admin,
}

impl AccountRole {
    /// Whether this role grants access to the admin surface.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid account role: {s}")),
        }
    }
}

/// Order lifecycle status.
///
/// Linear forward progression (Pending → Processing → Shipped → Delivered)
/// driven by admin updates, plus a terminal `Cancelled` branch reachable
/// from any non-terminal state through the cancellation path only. Admin
/// status updates cannot set `Cancelled`; cancellation has its own endpoint
/// because it credits stock back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.order_status", rename_all = "lowercase")
)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Statuses an admin may set directly. `Cancelled` is excluded.
    pub const ADMIN_SETTABLE: [Self; 4] =
        [Self::Pending, Self::Processing, Self::Shipped, Self::Delivered];

    /// Whether an order in this status can still be cancelled.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Whether an admin may set this status via an order update.
    #[must_use]
    pub const fn is_admin_settable(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Processing => write!(f, "Processing"),
            Self::Shipped => write!(f, "Shipped"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display_from_str_roundtrip() {
        for role in [AccountRole::Customer, AccountRole::Admin] {
            assert_eq!(role.to_string().parse::<AccountRole>().unwrap(), role);
        }
        assert!("root".parse::<AccountRole>().is_err());
    }

    #[test]
    fn test_role_is_admin() {
        assert!(AccountRole::Admin.is_admin());
        assert!(!AccountRole::Customer.is_admin());
    }

    #[test]
    fn test_status_display_from_str_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("Returned".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_from_str_is_exact() {
        assert!("pending".parse::<OrderStatus>().is_err());
        assert!("PENDING".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_admin_settable_excludes_cancelled() {
        assert!(!OrderStatus::Cancelled.is_admin_settable());
        for status in OrderStatus::ADMIN_SETTABLE {
            assert!(status.is_admin_settable());
        }
    }

    #[test]
    fn test_cancellable() {
        assert!(OrderStatus::Pending.is_cancellable());
        assert!(OrderStatus::Delivered.is_cancellable());
        assert!(!OrderStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn test_status_serializes_capitalized() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"Pending\"");
    }
}

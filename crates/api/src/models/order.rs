//! Orders and their line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stride_core::{AccountId, Email, OrderId, OrderStatus, ProductId};

use super::cart::ProductSummary;

/// One line of an order, copied from the cart at checkout.
///
/// Orders record product, size and quantity only; the price paid is
/// captured in the order total, computed at checkout. A later price
/// change on the product does not alter the stored total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: u32,
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub account_id: AccountId,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// An order joined with its account, as stored.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithAccount {
    pub id: OrderId,
    pub account_id: AccountId,
    pub account_name: String,
    pub account_email: Email,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One order line with its product resolved.
///
/// `product` is `None` when the product was deleted after the order was
/// placed; the line itself is preserved.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineView {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: u32,
    pub product: Option<ProductSummary>,
}

/// An order as the admin panel sees it: account details joined on and a
/// current product summary resolved for each line.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrderView {
    pub id: OrderId,
    pub account_id: AccountId,
    pub account_name: String,
    pub account_email: Email,
    pub items: Vec<OrderLineView>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

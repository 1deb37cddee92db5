//! Shopping carts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stride_core::{AccountId, CartId, ProductId};

/// One line of a cart: a product, a size, and how many.
///
/// Lines are keyed by `(product_id, size)`; adding the same pair again
/// merges quantities instead of growing the list. Stored as JSONB on the
/// cart row, so this shape is also the persisted one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: u32,
}

impl CartItem {
    /// Whether this line is for the given product and size.
    #[must_use]
    pub fn matches(&self, product_id: ProductId, size: &str) -> bool {
        self.product_id == product_id && self.size == size
    }
}

/// A customer's cart as stored.
///
/// At most one cart exists per account; it is created lazily on the first
/// add and deleted outright on clear.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub id: CartId,
    pub account_id: AccountId,
    pub items: Vec<CartItem>,
    pub updated_at: DateTime<Utc>,
}

/// Slimmed-down product details embedded in cart and admin order
/// responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub in_stock: bool,
}

impl ProductSummary {
    /// Slim a full product down to the embedded shape.
    #[must_use]
    pub fn of(product: &super::product::Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            in_stock: product.in_stock,
        }
    }
}

/// One cart line with its product resolved.
///
/// `product` is `None` when the product was deleted after the line was
/// added; the line is kept so the client can show and remove it.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: u32,
    pub product: Option<ProductSummary>,
}

/// The cart as returned to the storefront.
///
/// `id` and `updated_at` are `None` when the account has no cart row yet;
/// fetching a missing cart yields this empty view rather than a 404.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub id: Option<CartId>,
    pub items: Vec<CartLineView>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CartView {
    /// An empty view for accounts that have no cart row yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            id: None,
            items: Vec::new(),
            updated_at: None,
        }
    }
}

//! Cart service.
//!
//! Every mutation validates the requested quantity against the product's
//! current per-size stock before writing. Validation is advisory: stock
//! is only debited at checkout, so what fit in the cart can still be gone
//! by then.

use sqlx::PgPool;
use stride_core::{AccountId, ProductId};

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::{Cart, CartItem, CartLineView, CartView, ProductSummary};

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Add a quantity of a product size to the cart.
    ///
    /// The cart row is created lazily on the first add. A line for the
    /// same `(product, size)` pair accumulates quantity instead of
    /// duplicating, and the accumulated quantity may not exceed that
    /// size's current stock.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for a blank size, an unknown size, a zero
    /// quantity, an out-of-stock size or a quantity exceeding stock, and
    /// `NotFound` for an unknown product.
    pub async fn add_item(
        &self,
        account_id: AccountId,
        product_id: ProductId,
        size: &str,
        quantity: u32,
    ) -> Result<Cart> {
        if size.is_empty() {
            return Err(AppError::BadRequest("Size is required".to_string()));
        }
        if quantity == 0 {
            return Err(AppError::BadRequest(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let max_stock = product
            .sizes
            .stock_of(size)
            .ok_or_else(|| AppError::BadRequest(format!("Size {size} not available")))?;

        if max_stock == 0 {
            return Err(AppError::BadRequest(format!(
                "{} (Size {size}) is Out of Stock",
                product.name
            )));
        }

        let mut items = match self.carts.get_by_account(account_id).await? {
            Some(cart) => cart.items,
            None => Vec::new(),
        };

        let current = items
            .iter()
            .find(|item| item.matches(product_id, size))
            .map_or(0, |item| item.quantity);

        let total = accumulated_quantity(current, quantity, max_stock, size)?;

        if let Some(item) = items.iter_mut().find(|item| item.matches(product_id, size)) {
            item.quantity = total;
        } else {
            items.push(CartItem {
                product_id,
                size: size.to_string(),
                quantity: total,
            });
        }

        Ok(self.carts.upsert_items(account_id, &items).await?)
    }

    /// Set the absolute quantity of an existing cart line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the cart, the line or the product is
    /// missing, and `BadRequest` when the size vanished from the product
    /// or the quantity is zero or exceeds stock.
    pub async fn update_item(
        &self,
        account_id: AccountId,
        product_id: ProductId,
        size: &str,
        quantity: u32,
    ) -> Result<Cart> {
        if quantity == 0 {
            return Err(AppError::BadRequest(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let cart = self
            .carts
            .get_by_account(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

        let mut items = cart.items;
        if !items.iter().any(|item| item.matches(product_id, size)) {
            return Err(AppError::NotFound("Item not found in cart".to_string()));
        }

        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let max_stock = product
            .sizes
            .stock_of(size)
            .ok_or_else(|| AppError::BadRequest("Invalid size".to_string()))?;

        if quantity > max_stock {
            return Err(AppError::BadRequest(format!(
                "Only {max_stock} available for size {size}"
            )));
        }

        if let Some(item) = items.iter_mut().find(|item| item.matches(product_id, size)) {
            item.quantity = quantity;
        }

        Ok(self.carts.upsert_items(account_id, &items).await?)
    }

    /// Remove a cart line.
    ///
    /// Removal is a filter: a line that is already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` only when the account has no cart at all.
    pub async fn remove_item(
        &self,
        account_id: AccountId,
        product_id: ProductId,
        size: &str,
    ) -> Result<Cart> {
        let cart = self
            .carts
            .get_by_account(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

        let items: Vec<CartItem> = cart
            .items
            .into_iter()
            .filter(|item| !item.matches(product_id, size))
            .collect();

        Ok(self.carts.upsert_items(account_id, &items).await?)
    }

    /// Delete the cart row entirely.
    ///
    /// Clearing an absent cart is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the delete fails.
    pub async fn clear(&self, account_id: AccountId) -> Result<()> {
        self.carts.delete_by_account(account_id).await?;
        Ok(())
    }

    /// Fetch the cart with product details resolved.
    ///
    /// An account without a cart row gets an empty view, never a 404.
    /// Lines whose product has since been deleted keep a `None` product.
    ///
    /// # Errors
    ///
    /// Returns an error when a query fails.
    pub async fn get_view(&self, account_id: AccountId) -> Result<CartView> {
        let Some(cart) = self.carts.get_by_account(account_id).await? else {
            return Ok(CartView::empty());
        };

        let ids: Vec<ProductId> = cart.items.iter().map(|item| item.product_id).collect();
        let products = self.products.get_many(&ids).await?;

        let items = cart
            .items
            .into_iter()
            .map(|item| {
                let product = products
                    .iter()
                    .find(|p| p.id == item.product_id)
                    .map(ProductSummary::of);

                CartLineView {
                    product_id: item.product_id,
                    size: item.size,
                    quantity: item.quantity,
                    product,
                }
            })
            .collect();

        Ok(CartView {
            id: Some(cart.id),
            items,
            updated_at: Some(cart.updated_at),
        })
    }
}

/// What the line would hold after adding `quantity` to `current`.
///
/// The sum is computed with `checked_add` so a quantity chosen to wrap
/// `u32` is rejected like any other over-stock request instead of
/// slipping past the cap.
fn accumulated_quantity(current: u32, quantity: u32, max_stock: u32, size: &str) -> Result<u32> {
    match current.checked_add(quantity) {
        Some(total) if total <= max_stock => Ok(total),
        _ => Err(AppError::BadRequest(format!(
            "Only {max_stock} available for size {size}"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_within_stock() {
        assert_eq!(accumulated_quantity(0, 3, 10, "9").unwrap(), 3);
        assert_eq!(accumulated_quantity(2, 4, 10, "9").unwrap(), 6);
        assert_eq!(accumulated_quantity(4, 6, 10, "9").unwrap(), 10);
    }

    #[test]
    fn test_rejects_over_stock() {
        let err = accumulated_quantity(4, 7, 10, "9").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad request: Only 10 available for size 9"
        );
    }

    #[test]
    fn test_rejects_wrapping_quantity() {
        // 2 + u32::MAX wraps to 1, which would sneak under the cap.
        let err = accumulated_quantity(2, u32::MAX, 10, "9").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad request: Only 10 available for size 9"
        );

        assert!(accumulated_quantity(u32::MAX, u32::MAX, u32::MAX, "9").is_err());
    }
}

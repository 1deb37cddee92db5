//! Order service: checkout, queries, cancellation and admin edits.
//!
//! Checkout and cancellation move stock. Every stock write goes through
//! the product row's version guard: read the product, adjust the size
//! list in memory, then write it back only if the version is unchanged.
//! A failed guard means another writer got there first; the loop re-reads
//! and tries again, up to [`STOCK_RETRY_LIMIT`] times. Two checkouts
//! racing for the last pair therefore cannot both debit it; the loser
//! re-reads, sees zero stock and is rejected.

use rust_decimal::Decimal;
use sqlx::PgPool;
use stride_core::{AccountId, OrderId, OrderStatus, ProductId, StockError};
use tracing::instrument;

use crate::db::{CartRepository, OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::{
    AdminOrderView, CartItem, Order, OrderItem, OrderLineView, OrderWithAccount, Product,
    ProductSummary,
};

/// How many times a guarded stock write is retried before giving up.
const STOCK_RETRY_LIMIT: u32 = 5;

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Convert the account's cart into an order, debiting stock.
    ///
    /// Runs in three phases: validate every line against current stock
    /// and accumulate the total, debit line by line through the version
    /// guard, then insert the order and empty the cart in one
    /// transaction. When a later line fails, the debits already applied
    /// are credited back before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for an empty cart, a vanished size or
    /// insufficient stock, `NotFound` for a vanished product, and
    /// `Conflict` when stock contention outlasts the retry budget.
    #[instrument(skip(self))]
    pub async fn checkout(&self, account_id: AccountId) -> Result<Order> {
        let cart = self.carts.get_by_account(account_id).await?;
        let items = match cart {
            Some(cart) if !cart.items.is_empty() => cart.items,
            _ => return Err(AppError::BadRequest("Cart is empty".to_string())),
        };

        // Validation pass: price the cart against current stock before
        // touching anything.
        let mut total = Decimal::ZERO;
        for item in &items {
            let product = self
                .products
                .get(item.product_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

            let available = product.sizes.stock_of(&item.size).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Size {} not found for {}",
                    item.size, product.name
                ))
            })?;

            if available < item.quantity {
                return Err(AppError::BadRequest(format!(
                    "Only {available} left for size {} of {}",
                    item.size, product.name
                )));
            }

            total += product.price * Decimal::from(item.quantity);
        }

        // Debit pass. Lines already debited are credited back if a later
        // line fails, so an aborted checkout does not leak stock.
        let mut debited: Vec<&CartItem> = Vec::new();
        for item in &items {
            match self
                .debit_with_retry(item.product_id, &item.size, item.quantity)
                .await
            {
                Ok(()) => debited.push(item),
                Err(err) => {
                    self.credit_all(debited.iter().map(|i| (i.product_id, i.size.as_str(), i.quantity)))
                        .await;
                    return Err(err);
                }
            }
        }

        let order_items: Vec<OrderItem> = items
            .iter()
            .map(|item| OrderItem {
                product_id: item.product_id,
                size: item.size.clone(),
                quantity: item.quantity,
            })
            .collect();

        match self.orders.place(account_id, &order_items, total).await {
            Ok(order) => Ok(order),
            Err(err) => {
                self.credit_all(debited.iter().map(|i| (i.product_id, i.size.as_str(), i.quantity)))
                    .await;
                Err(err.into())
            }
        }
    }

    /// List the account's orders.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub async fn list(&self, account_id: AccountId) -> Result<Vec<Order>> {
        Ok(self.orders.list_by_account(account_id).await?)
    }

    /// Fetch one of the account's orders.
    ///
    /// Another account's order is reported as not found, not forbidden.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the order is absent or owned by someone
    /// else.
    pub async fn get(&self, account_id: AccountId, id: OrderId) -> Result<Order> {
        self.orders
            .get_for_account(id, account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    /// Cancel one of the account's orders and restore its stock.
    ///
    /// The status flip is the claim: of any number of concurrent cancels,
    /// exactly one wins the `not-yet-cancelled -> cancelled` update and
    /// goes on to credit stock back. Restore is per-line best effort: a
    /// product deleted since the order was placed is skipped, and a line
    /// whose guarded write keeps losing races is logged and skipped
    /// rather than failing the already-cancelled order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an absent or foreign order and `BadRequest`
    /// when the order is already cancelled.
    #[instrument(skip(self))]
    pub async fn cancel(&self, account_id: AccountId, id: OrderId) -> Result<Order> {
        let mut order = self
            .orders
            .get_for_account(id, account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        if !order.status.is_cancellable() {
            return Err(AppError::BadRequest("Order already cancelled".to_string()));
        }

        if !self.orders.mark_cancelled(id).await? {
            // A concurrent cancel claimed it between our read and write.
            return Err(AppError::BadRequest("Order already cancelled".to_string()));
        }

        self.credit_all(
            order
                .items
                .iter()
                .map(|i| (i.product_id, i.size.as_str(), i.quantity)),
        )
        .await;

        order.status = OrderStatus::Cancelled;
        Ok(order)
    }

    // =========================================================================
    // Admin operations
    // =========================================================================

    /// List every order with account details and line products resolved.
    ///
    /// Products across all orders are fetched in one batch; a line whose
    /// product has since been deleted keeps a `None` product.
    ///
    /// # Errors
    ///
    /// Returns an error when a query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminOrderView>> {
        let orders = self.orders.list_all().await?;

        let mut ids: Vec<ProductId> = orders
            .iter()
            .flat_map(|order| order.items.iter().map(|item| item.product_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let products = self.products.get_many(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| admin_view(order, &products))
            .collect())
    }

    /// Fetch any order by id, with account details and line products.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no order has the given id.
    pub async fn admin_get(&self, id: OrderId) -> Result<AdminOrderView> {
        let order = self
            .orders
            .get_with_account(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        self.resolve_admin_view(order).await
    }

    /// Apply an admin edit to an order.
    ///
    /// Items and total are replaced as given without touching stock;
    /// admin edits are trusted to know what they are doing. The updated
    /// order is returned in the same resolved shape as [`Self::admin_get`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no order has the given id.
    pub async fn admin_update(
        &self,
        id: OrderId,
        status: Option<OrderStatus>,
        items: Option<&[OrderItem]>,
        total: Option<Decimal>,
    ) -> Result<AdminOrderView> {
        self.orders
            .update(id, status, items, total)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        self.admin_get(id).await
    }

    /// Resolve one order's line products into the admin view.
    async fn resolve_admin_view(&self, order: OrderWithAccount) -> Result<AdminOrderView> {
        let ids: Vec<ProductId> = order.items.iter().map(|item| item.product_id).collect();
        let products = self.products.get_many(&ids).await?;

        Ok(admin_view(order, &products))
    }

    /// Delete an order outright. Stock is not restored.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no order has the given id.
    pub async fn admin_delete(&self, id: OrderId) -> Result<()> {
        if !self.orders.delete(id).await? {
            return Err(AppError::NotFound("Order not found".to_string()));
        }

        Ok(())
    }

    // =========================================================================
    // Guarded stock writes
    // =========================================================================

    /// Debit one line's quantity from its size variant.
    ///
    /// Re-reads the product on every attempt so the debit always applies
    /// to fresh stock.
    async fn debit_with_retry(
        &self,
        product_id: ProductId,
        size: &str,
        quantity: u32,
    ) -> Result<()> {
        for _ in 0..STOCK_RETRY_LIMIT {
            let product = self
                .products
                .get(product_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

            let mut sizes = product.sizes.clone();
            match sizes.debit(size, quantity) {
                Ok(()) => {}
                Err(StockError::UnknownSize { .. }) => {
                    return Err(AppError::BadRequest(format!(
                        "Size {size} not found for {}",
                        product.name
                    )));
                }
                Err(StockError::Insufficient { available, .. }) => {
                    return Err(AppError::BadRequest(format!(
                        "Only {available} left for size {size} of {}",
                        product.name
                    )));
                }
            }

            if self
                .products
                .update_stock_guarded(product.id, product.version, &sizes)
                .await?
            {
                return Ok(());
            }
        }

        Err(AppError::Conflict(
            "Stock changed while placing the order, please retry".to_string(),
        ))
    }

    /// Credit one line's quantity back to its size variant.
    ///
    /// A vanished product or size label is skipped; there is nothing left
    /// to restore onto. Exhausting the retry budget is logged and
    /// swallowed so the caller's own outcome stands.
    async fn credit_with_retry(
        &self,
        product_id: ProductId,
        size: &str,
        quantity: u32,
    ) -> Result<()> {
        for _ in 0..STOCK_RETRY_LIMIT {
            let Some(product) = self.products.get(product_id).await? else {
                return Ok(());
            };

            let mut sizes = product.sizes.clone();
            sizes.credit(size, quantity);

            if self
                .products
                .update_stock_guarded(product.id, product.version, &sizes)
                .await?
            {
                return Ok(());
            }
        }

        tracing::error!(
            product_id = product_id.as_i32(),
            size,
            quantity,
            "stock credit lost {STOCK_RETRY_LIMIT} version races, giving up"
        );
        Ok(())
    }

    /// Credit a batch of lines, logging any line that fails.
    async fn credit_all<'b, I>(&self, lines: I)
    where
        I: Iterator<Item = (ProductId, &'b str, u32)>,
    {
        for (product_id, size, quantity) in lines {
            if let Err(err) = self.credit_with_retry(product_id, size, quantity).await {
                tracing::error!(
                    product_id = product_id.as_i32(),
                    size,
                    quantity,
                    error = %err,
                    "failed to credit stock back"
                );
            }
        }
    }
}

/// Join current product summaries onto an order's lines.
fn admin_view(order: OrderWithAccount, products: &[Product]) -> AdminOrderView {
    let items = order
        .items
        .into_iter()
        .map(|item| {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .map(ProductSummary::of);

            OrderLineView {
                product_id: item.product_id,
                size: item.size,
                quantity: item.quantity,
                product,
            }
        })
        .collect();

    AdminOrderView {
        id: order.id,
        account_id: order.account_id,
        account_name: order.account_name,
        account_email: order.account_email,
        items,
        total: order.total,
        status: order.status,
        created_at: order.created_at,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use stride_core::{Email, SizeSet, SizeVariant};

    use super::*;

    fn sample_product(id: i32, name: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(4999, 2),
            category: "sneakers".to_string(),
            image: Some(format!("/uploads/{name}.jpg")),
            sku: format!("SKU-{id}"),
            sizes: SizeSet::new(vec![SizeVariant::new("9", 5)]),
            stock: 5,
            in_stock: true,
            version: 1,
            created_at: Utc::now(),
        }
    }

    fn sample_order(items: Vec<OrderItem>) -> OrderWithAccount {
        OrderWithAccount {
            id: OrderId::new(1),
            account_id: AccountId::new(2),
            account_name: "Jordan".to_string(),
            account_email: Email::parse("jordan@example.com").unwrap(),
            items,
            total: Decimal::new(9998, 2),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_view_resolves_line_products() {
        let order = sample_order(vec![
            OrderItem {
                product_id: ProductId::new(10),
                size: "9".to_string(),
                quantity: 2,
            },
            OrderItem {
                product_id: ProductId::new(11),
                size: "10".to_string(),
                quantity: 1,
            },
        ]);
        let products = vec![sample_product(10, "runner"), sample_product(11, "court")];

        let view = admin_view(order, &products);

        assert_eq!(view.account_name, "Jordan");
        assert_eq!(view.items.len(), 2);
        let first = view.items[0].product.as_ref().unwrap();
        assert_eq!(first.name, "runner");
        assert_eq!(first.price, Decimal::new(4999, 2));
        assert_eq!(first.image.as_deref(), Some("/uploads/runner.jpg"));
        assert_eq!(view.items[1].product.as_ref().unwrap().name, "court");
    }

    #[test]
    fn test_admin_view_keeps_lines_for_deleted_products() {
        let order = sample_order(vec![OrderItem {
            product_id: ProductId::new(99),
            size: "9".to_string(),
            quantity: 1,
        }]);

        let view = admin_view(order, &[]);

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].quantity, 1);
        assert!(view.items[0].product.is_none());
    }
}

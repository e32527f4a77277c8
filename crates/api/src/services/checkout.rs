//! Checkout orchestration.
//!
//! Turns a set of requested items into a committed order. Only the order
//! insert itself is transactional; the follow-up steps (clearing the cart,
//! appending sale records) run after commit and must never fail the
//! checkout. A follow-up failure is retried once, then logged and reported
//! to Sentry for manual reconciliation.

use std::collections::HashMap;
use std::future::Future;

use sqlx::PgPool;
use tracing::{error, info, instrument, warn};

use clementine_core::{Identity, Money, ProductId, SaleState};

use crate::db::orders::NewOrderItem;
use crate::db::{
    CartRepository, CatalogRepository, OrderRepository, RepositoryError, SaleRepository,
};
use crate::error::AppError;
use crate::models::{Order, OrderItem, OrderWithItems, Product};

/// One requested checkout line: what the client wants to buy.
///
/// Holds only the product reference and quantity. Prices and names are
/// resolved server-side against the catalog, never taken from the client.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Service that orchestrates checkout.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order from the requested items.
    ///
    /// Every line is re-priced from the live catalog at this moment and the
    /// order total is the sum of those prices times quantities; the inserted
    /// line items snapshot that resolution permanently. After the order
    /// commits, the user's cart is cleared and one sale record per line is
    /// appended, both best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] when the item list is empty, a
    /// quantity is below 1, the shipping address is blank, or a product does
    /// not exist; [`AppError::Database`] when the order transaction fails
    /// (nothing is persisted in that case).
    #[instrument(skip(self, items), fields(user_id = %user.user_id, item_count = items.len()))]
    pub async fn place_order(
        &self,
        user: &Identity,
        shipping_address: &str,
        items: &[CheckoutItem],
    ) -> Result<OrderWithItems, AppError> {
        if shipping_address.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Shipping address is required".to_string(),
            ));
        }
        if items.is_empty() {
            return Err(AppError::BadRequest(
                "Order must contain at least one item".to_string(),
            ));
        }
        if items.iter().any(|item| item.quantity < 1) {
            return Err(AppError::BadRequest(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let lines = self.resolve_items(items).await?;
        let total: Money = lines
            .iter()
            .map(|line| line.price.line_total(line.quantity))
            .sum();

        let orders = OrderRepository::new(self.pool);
        let placed = orders
            .create(user.user_id, shipping_address, total, &lines)
            .await?;

        info!(
            order_id = %placed.order.id,
            total = %placed.order.total_amount,
            "Order committed"
        );

        self.run_follow_up(user, &placed.order, &placed.items).await;

        Ok(placed)
    }

    /// Resolve the requested items against the live catalog.
    ///
    /// A product missing from the catalog fails the whole checkout before
    /// any write happens.
    async fn resolve_items(&self, items: &[CheckoutItem]) -> Result<Vec<NewOrderItem>, AppError> {
        let ids: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();

        let catalog = CatalogRepository::new(self.pool);
        let products = catalog.get_by_ids(&ids).await?;
        let by_id: HashMap<ProductId, Product> = products
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        items
            .iter()
            .map(|item| {
                let product = by_id.get(&item.product_id).ok_or_else(|| {
                    AppError::BadRequest(format!("Product {} does not exist", item.product_id))
                })?;
                Ok(NewOrderItem {
                    product_id: product.id,
                    product_name: product.name.clone(),
                    quantity: item.quantity,
                    price: product.price,
                })
            })
            .collect()
    }

    /// Post-commit follow-up: clear the cart, then append sale records.
    ///
    /// The order is already committed when this runs, so failures are
    /// reported rather than propagated.
    async fn run_follow_up(&self, user: &Identity, order: &Order, items: &[OrderItem]) {
        let cart = CartRepository::new(self.pool);
        if let Err(e) = retry_once("cart_clear", || cart.clear(user.user_id)).await {
            report_follow_up_failure(order, "cart_clear", &e);
        }

        let sales = SaleRepository::new(self.pool);
        for item in items {
            let appended = retry_once("sale_record", || {
                sales.append(
                    user.user_id,
                    &item.product_name,
                    item.quantity,
                    SaleState::Hold,
                )
            })
            .await;
            if let Err(e) = appended {
                report_follow_up_failure(order, "sale_record", &e);
            }
        }
    }
}

/// Run a follow-up step, retrying once on failure.
async fn retry_once<T, F, Fut>(step: &str, mut op: F) -> Result<T, RepositoryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RepositoryError>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(first) => {
            warn!(step, error = %first, "Follow-up step failed, retrying");
            op().await
        }
    }
}

/// Alert path for a follow-up step that failed after the order committed.
///
/// The order stands; the failed step needs manual reconciliation, so this
/// goes to Sentry tagged with the step and order.
fn report_follow_up_failure(order: &Order, step: &str, error: &RepositoryError) {
    error!(
        order_id = %order.id,
        step,
        error = %error,
        "Post-commit follow-up step failed"
    );
    sentry::with_scope(
        |scope| {
            scope.set_tag("checkout_step", step);
            scope.set_tag("order_id", order.id.to_string());
        },
        || sentry::capture_error(error),
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn transient() -> RepositoryError {
        RepositoryError::DataCorruption("transient".to_string())
    }

    #[tokio::test]
    async fn test_retry_once_passes_through_success() {
        let calls = Cell::new(0);
        let result = retry_once("step", || {
            calls.set(calls.get() + 1);
            async { Ok(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_retry_once_recovers_after_single_failure() {
        let calls = Cell::new(0);
        let result = retry_once("step", || {
            let attempt = calls.get();
            calls.set(attempt + 1);
            async move {
                if attempt == 0 {
                    Err(transient())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_retry_once_gives_up_after_second_failure() {
        let calls = Cell::new(0);
        let result: Result<i32, _> = retry_once("step", || {
            calls.set(calls.get() + 1);
            async { Err(transient()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 2);
    }
}

//! Order ledger repository.
//!
//! Order creation is the one multi-statement transaction in the service:
//! the header insert and every line-item insert commit or roll back as a
//! single unit, so a partially written order is never observable.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use clementine_core::{Money, OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{AdminOrderSummary, Order, OrderItem, OrderWithItems};

/// One line of a new order: the catalog-resolved snapshot to persist.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub price: Money,
}

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    total_amount: Money,
    shipping_address: String,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            total_amount: row.total_amount,
            shipping_address: row.shipping_address,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for `PostgreSQL` order item queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    product_name: String,
    quantity: i32,
    price: Money,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

/// Internal row type for orders joined with the owning username.
#[derive(Debug, sqlx::FromRow)]
struct AdminOrderRow {
    id: i32,
    user_id: i32,
    total_amount: Money,
    shipping_address: String,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    username: String,
}

impl From<AdminOrderRow> for AdminOrderSummary {
    fn from(row: AdminOrderRow) -> Self {
        Self {
            order: Order {
                id: OrderId::new(row.id),
                user_id: UserId::new(row.user_id),
                total_amount: row.total_amount,
                shipping_address: row.shipping_address,
                status: row.status,
                created_at: row.created_at,
            },
            username: row.username,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order with its line items in a single transaction.
    ///
    /// Inserts the header first, then one row per item in the given order.
    /// Any failure rolls the whole unit back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any insert or the commit fails; the
    /// database is left untouched in that case.
    pub async fn create(
        &self,
        user_id: UserId,
        shipping_address: &str,
        total_amount: Money,
        items: &[NewOrderItem],
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (user_id, total_amount, shipping_address, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, total_amount, shipping_address, status, created_at
            ",
        )
        .bind(user_id)
        .bind(total_amount)
        .bind(shipping_address)
        .bind(OrderStatus::Pending)
        .fetch_one(&mut *tx)
        .await?;
        let order = Order::from(order_row);

        let mut order_items = Vec::with_capacity(items.len());
        for item in items {
            let item_row = sqlx::query_as::<_, OrderItemRow>(
                r"
                INSERT INTO order_items (order_id, product_id, product_name, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, order_id, product_id, product_name, quantity, price
                ",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.price)
            .fetch_one(&mut *tx)
            .await?;
            order_items.push(OrderItem::from(item_row));
        }

        tx.commit().await?;

        Ok(OrderWithItems {
            order,
            items: order_items,
        })
    }

    /// Get one order header by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, total_amount, shipping_address, status, created_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// Get the line items for an order, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, product_id, product_name, quantity, price
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    /// List a user's orders, newest first, each with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a database query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders: Vec<Order> = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, total_amount, shipping_address, status, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

        let order_ids: Vec<OrderId> = orders.iter().map(|order| order.id).collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, product_id, product_name, quantity, price
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            items_by_order
                .entry(OrderId::new(row.order_id))
                .or_default()
                .push(OrderItem::from(row));
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect())
    }

    /// List all orders across users, newest first, with usernames attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminOrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminOrderRow>(
            r"
            SELECT o.id, o.user_id, o.total_amount, o.shipping_address, o.status,
                   o.created_at, u.username
            FROM orders o
            JOIN users u ON o.user_id = u.id
            ORDER BY o.created_at DESC, o.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(AdminOrderSummary::from).collect())
    }

    /// Move an order from `expected` to `next`, returning the updated header.
    ///
    /// The update only applies while the order still holds `expected`;
    /// `None` means the order is gone or another transition won the race.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE orders
            SET status = $3
            WHERE id = $1 AND status = $2
            RETURNING id, user_id, total_amount, shipping_address, status, created_at
            ",
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }
}

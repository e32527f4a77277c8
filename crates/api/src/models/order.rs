//! Order models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clementine_core::{Money, OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// An order header.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Sum of item price times quantity, fixed at checkout
    pub total_amount: Money,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A line item belonging to an order.
///
/// `product_name` and `price` are copies taken at checkout; later catalog
/// edits or deletions do not touch them.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub price: Money,
}

/// An order with its line items, as returned to the owner.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// An order annotated with the owning username, as listed for admins.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrderSummary {
    #[serde(flatten)]
    pub order: Order,
    pub username: String,
}

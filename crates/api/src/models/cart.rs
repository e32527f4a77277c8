//! Cart models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clementine_core::{CartItemId, Money, ProductId, UserId};

/// One row of a user's cart, exactly as stored.
///
/// Each user holds at most one entry per product; re-adding a product
/// increments `quantity` on the existing entry.
#[derive(Debug, Clone, Serialize)]
pub struct CartEntry {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

/// A cart entry joined with live catalog data for display.
///
/// `product_name` and `price` reflect the catalog at read time, not at the
/// time the entry was added.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Money,
    pub image: Option<String>,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

//! Catalog product read model.

use clementine_core::{Money, ProductId};

/// A catalog product as seen by the storefront.
///
/// The catalog service owns product writes; this API only reads the current
/// name, price, image, and stock to display carts and to snapshot orders.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub image: Option<String>,
    /// Units in stock
    pub stock: i32,
    /// Current price, rounded to cents
    pub price: Money,
}

//! Sale log models.

use serde::Serialize;

use clementine_core::{SaleRecordId, SaleState, UserId};

/// One append-only record of a completed sale.
///
/// Written after an order commits so fulfilment can track dispatch state
/// per product line. The product name is a copy, the same as on order items.
#[derive(Debug, Clone, Serialize)]
pub struct SaleRecord {
    pub id: SaleRecordId,
    pub product_name: String,
    pub user_id: UserId,
    pub quantity: i32,
    pub state: SaleState,
}

/// A sale record annotated with the buyer's username, as listed for admins.
#[derive(Debug, Clone, Serialize)]
pub struct SaleWithUser {
    #[serde(flatten)]
    pub sale: SaleRecord,
    pub username: String,
}

//! Domain models for the API.
//!
//! These are the shapes handlers return to clients; the raw database row
//! types live next to their repositories in [`crate::db`].

pub mod cart;
pub mod order;
pub mod product;
pub mod sale;

pub use cart::{CartEntry, CartLine};
pub use order::{AdminOrderSummary, Order, OrderItem, OrderWithItems};
pub use product::Product;
pub use sale::{SaleRecord, SaleWithUser};

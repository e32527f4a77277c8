//! Repositories over the Clementine `PostgreSQL` database.
//!
//! One repository per aggregate: carts, catalog, orders, sales. Each holds a
//! clone of the shared [`PgPool`] and surfaces failures as
//! [`RepositoryError`].
//!
//! ## Tables
//!
//! - `users` - mirror of credential-service accounts (id, username, role)
//! - `product` - catalog rows, written by the catalog service and read here
//! - `cart` - one row per (user, product) pair
//! - `orders` / `order_items` - order headers plus priced line snapshots
//! - `product_sold` - append-only sale log
//!
//! Migrations live in `crates/api/migrations/` and are applied with
//! `cargo run -p clementine-cli -- migrate`.

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod sales;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::CartRepository;
pub use catalog::CatalogRepository;
pub use orders::OrderRepository;
pub use sales::SaleRepository;

const POOL_MAX_CONNECTIONS: u32 = 10;
const POOL_MIN_CONNECTIONS: u32 = 2;
const POOL_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Requested row does not exist.
    #[error("not found")]
    NotFound,

    /// A stored value could not be decoded into its domain type.
    #[error("corrupt row: {0}")]
    DataCorruption(String),

    /// Query failed at the database level.
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    /// `RowNotFound` becomes [`RepositoryError::NotFound`] so a `fetch_one`
    /// on a missing row surfaces as 404, not a server fault.
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Database(other),
        }
    }
}

/// Connect a `PgPool` for the API.
///
/// Keeps a small floor of warm connections so the first request after idle
/// does not pay the handshake.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database is unreachable.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(POOL_MAX_CONNECTIONS)
        .min_connections(POOL_MIN_CONNECTIONS)
        .acquire_timeout(POOL_ACQUIRE_TIMEOUT)
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = RepositoryError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn other_sqlx_errors_stay_database_errors() {
        let err = RepositoryError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}

//! Read-only access to the product catalog.
//!
//! The catalog service owns product writes; checkout and cart validation
//! only ever read. Queries bind at runtime against the schema in
//! `crates/api/migrations/`.

use sqlx::PgPool;

use clementine_core::{Money, ProductId};

use super::RepositoryError;
use crate::models::Product;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    product_name: String,
    image: Option<String>,
    quantity: i32,
    price: Money,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.product_name,
            image: row.image,
            stock: row.quantity,
            price: row.price,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, product_name, image, quantity, price
            FROM product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Fetch several products in one round trip, e.g. to price a checkout.
    ///
    /// Products missing from the catalog are simply absent from the result;
    /// callers decide whether absence is an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn get_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, product_name, image, quantity, price
            FROM product
            WHERE id = ANY($1)
            ",
        )
        .bind(ids.to_vec())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }
}

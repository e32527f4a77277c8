//! Sale log repository.
//!
//! `product_sold` is append-only from the API's point of view; rows are
//! written after checkout and updated only by fulfilment tooling.

use sqlx::PgPool;

use clementine_core::{SaleRecordId, SaleState, UserId};

use super::RepositoryError;
use crate::models::{SaleRecord, SaleWithUser};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` sale log queries.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i32,
    product_name: String,
    user_id: i32,
    quantity: i32,
    state: SaleState,
}

impl From<SaleRow> for SaleRecord {
    fn from(row: SaleRow) -> Self {
        Self {
            id: SaleRecordId::new(row.id),
            product_name: row.product_name,
            user_id: UserId::new(row.user_id),
            quantity: row.quantity,
            state: row.state,
        }
    }
}

/// Internal row type for sale rows joined with the buyer's username.
#[derive(Debug, sqlx::FromRow)]
struct SaleWithUserRow {
    id: i32,
    product_name: String,
    user_id: i32,
    quantity: i32,
    state: SaleState,
    username: String,
}

impl From<SaleWithUserRow> for SaleWithUser {
    fn from(row: SaleWithUserRow) -> Self {
        Self {
            sale: SaleRecord {
                id: SaleRecordId::new(row.id),
                product_name: row.product_name,
                user_id: UserId::new(row.user_id),
                quantity: row.quantity,
                state: row.state,
            },
            username: row.username,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale log database operations.
pub struct SaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale log repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append one sale record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn append(
        &self,
        user_id: UserId,
        product_name: &str,
        quantity: i32,
        state: SaleState,
    ) -> Result<SaleRecord, RepositoryError> {
        let row = sqlx::query_as::<_, SaleRow>(
            r"
            INSERT INTO product_sold (product_name, user_id, quantity, state)
            VALUES ($1, $2, $3, $4)
            RETURNING id, product_name, user_id, quantity, state
            ",
        )
        .bind(product_name)
        .bind(user_id)
        .bind(quantity)
        .bind(state)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List every sale record, newest first, with usernames attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<SaleWithUser>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleWithUserRow>(
            r"
            SELECT ps.id, ps.product_name, ps.user_id, ps.quantity, ps.state, u.username
            FROM product_sold ps
            JOIN users u ON ps.user_id = u.id
            ORDER BY ps.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(SaleWithUser::from).collect())
    }
}

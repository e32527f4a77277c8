//! Cart repository.
//!
//! Every operation is scoped to the owning user; there is no way to read or
//! touch another user's cart rows through this interface.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use clementine_core::{CartItemId, Money, ProductId, UserId};

use super::RepositoryError;
use crate::models::{CartEntry, CartLine};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` cart queries.
#[derive(Debug, sqlx::FromRow)]
struct CartEntryRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    quantity: i32,
    added_at: DateTime<Utc>,
}

impl From<CartEntryRow> for CartEntry {
    fn from(row: CartEntryRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            added_at: row.added_at,
        }
    }
}

/// Internal row type for cart rows joined with the catalog.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: i32,
    product_id: i32,
    product_name: String,
    price: Money,
    image: Option<String>,
    quantity: i32,
    added_at: DateTime<Utc>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            price: row.price,
            image: row.image,
            quantity: row.quantity,
            added_at: row.added_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a product to a user's cart.
    ///
    /// The cart holds one row per (user, product) pair; adding a product
    /// that is already present increments the existing row's quantity
    /// instead of inserting a duplicate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartEntry, RepositoryError> {
        let row = sqlx::query_as::<_, CartEntryRow>(
            r"
            INSERT INTO cart (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = cart.quantity + EXCLUDED.quantity
            RETURNING id, user_id, product_id, quantity, added_at
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List a user's cart joined with live catalog data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT c.id, c.product_id, p.product_name, p.price, p.image, c.quantity, c.added_at
            FROM cart c
            JOIN product p ON c.product_id = p.id
            WHERE c.user_id = $1
            ORDER BY c.id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    /// Set the quantity on a cart entry owned by the user.
    ///
    /// Returns `None` when no entry with that ID belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        id: CartItemId,
        quantity: i32,
    ) -> Result<Option<CartEntry>, RepositoryError> {
        let row = sqlx::query_as::<_, CartEntryRow>(
            r"
            UPDATE cart
            SET quantity = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, product_id, quantity, added_at
            ",
        )
        .bind(id)
        .bind(user_id)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CartEntry::from))
    }

    /// Remove one cart entry owned by the user.
    ///
    /// Returns `None` when no entry with that ID belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        id: CartItemId,
    ) -> Result<Option<CartEntry>, RepositoryError> {
        let row = sqlx::query_as::<_, CartEntryRow>(
            r"
            DELETE FROM cart
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, product_id, quantity, added_at
            ",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CartEntry::from))
    }

    /// Remove every cart entry for the user, returning what was removed.
    ///
    /// An already-empty cart yields an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<Vec<CartEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartEntryRow>(
            r"
            DELETE FROM cart
            WHERE user_id = $1
            RETURNING id, user_id, product_id, quantity, added_at
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CartEntry::from).collect())
    }
}

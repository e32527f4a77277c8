//! Cart endpoints.
//!
//! All cart routes require authentication and operate only on the caller's
//! own rows. Quantity and product existence are validated here, before any
//! write.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clementine_core::{CartItemId, ProductId};

use crate::db::{CartRepository, CatalogRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{CartEntry, CartLine};
use crate::state::AppState;

/// Build the cart router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart/add", post(add))
        .route("/cart/my-cart", get(my_cart))
        .route("/cart/item/{id}", put(update_quantity).delete(remove))
        .route("/cart/clear", delete(clear))
}

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub message: String,
    pub cart_item: CartEntry,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartListResponse {
    pub cart_items: Vec<CartLine>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCartResponse {
    pub message: String,
    pub removed_items: Vec<CartEntry>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Add a product to the caller's cart.
///
/// POST /cart/add
///
/// Re-adding a product the cart already holds increments the existing
/// entry's quantity rather than creating a duplicate row.
#[instrument(skip(state, body), fields(user_id = %identity.user_id))]
pub async fn add(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    body: Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CartItemResponse>), AppError> {
    let Json(body) = body?;
    validate_quantity(body.quantity)?;

    let product_id = ProductId::new(body.product_id);
    let catalog = CatalogRepository::new(state.pool());
    if catalog.get_by_id(product_id).await?.is_none() {
        return Err(AppError::BadRequest("Product does not exist".to_string()));
    }

    let cart = CartRepository::new(state.pool());
    let entry = cart.add(identity.user_id, product_id, body.quantity).await?;

    Ok((
        StatusCode::CREATED,
        Json(CartItemResponse {
            message: "Product added to cart".to_string(),
            cart_item: entry,
        }),
    ))
}

/// List the caller's cart with live catalog names and prices.
///
/// GET /cart/my-cart
#[instrument(skip(state), fields(user_id = %identity.user_id))]
pub async fn my_cart(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<CartListResponse>, AppError> {
    let cart = CartRepository::new(state.pool());
    let cart_items = cart.list(identity.user_id).await?;

    Ok(Json(CartListResponse { cart_items }))
}

/// Set the quantity on one of the caller's cart entries.
///
/// PUT /cart/item/{id}
///
/// Returns 404 when the entry does not exist or belongs to another user;
/// the two cases are indistinguishable to the caller.
#[instrument(skip(state, body), fields(user_id = %identity.user_id))]
pub async fn update_quantity(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Result<Json<UpdateQuantityRequest>, JsonRejection>,
) -> Result<Json<CartItemResponse>, AppError> {
    let Json(body) = body?;
    validate_quantity(body.quantity)?;

    let cart = CartRepository::new(state.pool());
    let entry = cart
        .set_quantity(identity.user_id, CartItemId::new(id), body.quantity)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

    Ok(Json(CartItemResponse {
        message: "Cart item updated".to_string(),
        cart_item: entry,
    }))
}

/// Remove one of the caller's cart entries.
///
/// DELETE /cart/item/{id}
#[instrument(skip(state), fields(user_id = %identity.user_id))]
pub async fn remove(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CartItemResponse>, AppError> {
    let cart = CartRepository::new(state.pool());
    let entry = cart
        .remove(identity.user_id, CartItemId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

    Ok(Json(CartItemResponse {
        message: "Item removed from cart".to_string(),
        cart_item: entry,
    }))
}

/// Empty the caller's cart, returning what was removed.
///
/// DELETE /cart/clear
///
/// An already-empty cart is reported as 404 so clients can tell the
/// difference between "cleared now" and "nothing to clear".
#[instrument(skip(state), fields(user_id = %identity.user_id))]
pub async fn clear(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ClearCartResponse>, AppError> {
    let cart = CartRepository::new(state.pool());
    let removed_items = cart.clear(identity.user_id).await?;

    if removed_items.is_empty() {
        return Err(AppError::NotFound("Cart is already empty".to_string()));
    }

    Ok(Json(ClearCartResponse {
        message: "Cart cleared successfully".to_string(),
        removed_items,
    }))
}

/// Reject zero and negative quantities before they reach storage.
fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use clementine_core::UserId;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(500).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_cart_item_response_uses_camel_case_envelope() {
        let response = CartItemResponse {
            message: "Product added to cart".to_string(),
            cart_item: CartEntry {
                id: CartItemId::new(7),
                user_id: UserId::new(1),
                product_id: ProductId::new(3),
                quantity: 2,
                added_at: Utc::now(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        // Envelope keys are camelCase; row fields keep their column names
        let cart_item = json.get("cartItem").unwrap();
        assert!(cart_item.get("product_id").is_some());
        assert_eq!(cart_item.get("quantity").unwrap(), 2);
    }

    #[test]
    fn test_add_to_cart_request_rejects_missing_fields() {
        let result = serde_json::from_str::<AddToCartRequest>(r#"{"product_id": 1}"#);
        assert!(result.is_err());
    }
}

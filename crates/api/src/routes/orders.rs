//! Order endpoints.
//!
//! Checkout itself lives in [`crate::services::checkout`]; these handlers
//! validate the request shape, apply the authorization rules, and translate
//! between wire envelopes and the repositories.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clementine_core::{Capability, OrderId, OrderStatus, ProductId};

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{AdminOrderSummary, Order, OrderItem, OrderWithItems};
use crate::services::checkout::{CheckoutItem, CheckoutService};
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders/create", post(create))
        .route("/orders/my-orders", get(my_orders))
        .route("/orders/{id}", get(show))
        .route("/orders/{id}/status", put(update_status))
        .route("/orders", get(list_all))
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// One requested checkout line. Clients send only the product reference and
/// quantity; names and prices come from the catalog server-side.
#[derive(Debug, Deserialize)]
pub struct CheckoutItemRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub shipping_address: String,
    pub items: Vec<CheckoutItemRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub message: String,
    pub order: Order,
    pub order_items: Vec<OrderItem>,
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderWithItems>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: OrderWithItems,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub message: String,
    pub order: Order,
}

#[derive(Debug, Serialize)]
pub struct AdminOrderListResponse {
    pub orders: Vec<AdminOrderSummary>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Checkout: turn the submitted items into a committed order.
///
/// POST /orders/create
#[instrument(skip(state, body), fields(user_id = %identity.user_id))]
pub async fn create(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CheckoutResponse>), AppError> {
    let Json(body) = body?;

    let items: Vec<CheckoutItem> = body
        .items
        .iter()
        .map(|item| CheckoutItem {
            product_id: ProductId::new(item.product_id),
            quantity: item.quantity,
        })
        .collect();

    let checkout = CheckoutService::new(state.pool());
    let placed = checkout
        .place_order(&identity, &body.shipping_address, &items)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            message: "Order created successfully".to_string(),
            order: placed.order,
            order_items: placed.items,
        }),
    ))
}

/// List the caller's own orders, newest first, with line items.
///
/// GET /orders/my-orders
#[instrument(skip(state), fields(user_id = %identity.user_id))]
pub async fn my_orders(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<OrderListResponse>, AppError> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list_for_user(identity.user_id).await?;

    Ok(Json(OrderListResponse { orders }))
}

/// Fetch one order with its items.
///
/// GET /orders/{id}
///
/// Owners see their own orders; admins see any. Existence is checked before
/// ownership, so an order that is not there is 404 even for a caller who
/// could not have viewed it.
#[instrument(skip(state), fields(user_id = %identity.user_id))]
pub async fn show(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderResponse>, AppError> {
    let repo = OrderRepository::new(state.pool());
    let order_id = OrderId::new(id);

    let order = repo
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if identity.user_id != order.user_id {
        identity.require(Capability::Admin)?;
    }

    let items = repo.items_for(order_id).await?;

    Ok(Json(OrderResponse {
        order: OrderWithItems { order, items },
    }))
}

/// Advance an order along its lifecycle.
///
/// PUT /orders/{id}/status
///
/// Admin only. Legal moves go forward (skips allowed) or to `cancelled`
/// from any non-terminal status; everything else is rejected as 400.
#[instrument(skip(state, body), fields(admin = %identity.username))]
pub async fn update_status(
    RequireAdmin(identity): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<StatusUpdateResponse>, AppError> {
    let Json(body) = body?;
    let next: OrderStatus = body.status.parse().map_err(AppError::BadRequest)?;

    let repo = OrderRepository::new(state.pool());
    let order_id = OrderId::new(id);

    let current = repo
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if !current.status.can_transition_to(next) {
        return Err(invalid_transition(current.status, next));
    }

    // The update is guarded on the status we just read; a concurrent
    // transition makes it a no-op and we re-check against the fresh row.
    match repo.update_status(order_id, current.status, next).await? {
        Some(order) => {
            tracing::info!(
                order_id = %order.id,
                from = %current.status,
                to = %order.status,
                "Order status updated"
            );
            Ok(Json(StatusUpdateResponse {
                message: "Order status updated".to_string(),
                order,
            }))
        }
        None => {
            let fresh = repo
                .get_by_id(order_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
            Err(invalid_transition(fresh.status, next))
        }
    }
}

/// List every order across all users, with the owning username.
///
/// GET /orders
#[instrument(skip(state), fields(admin = %identity.username))]
pub async fn list_all(
    RequireAdmin(identity): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<AdminOrderListResponse>, AppError> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list_all().await?;

    Ok(Json(AdminOrderListResponse { orders }))
}

fn invalid_transition(from: OrderStatus, to: OrderStatus) -> AppError {
    AppError::BadRequest(format!("Invalid status transition from {from} to {to}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_request_ignores_client_prices() {
        // Clients may send extra fields (like a price); only the reference
        // and quantity are read.
        let body = r#"{
            "shipping_address": "1 Orchard Lane",
            "items": [{"product_id": 4, "quantity": 2, "price": "0.01", "product_name": "nope"}]
        }"#;

        let request: CreateOrderRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.items.len(), 1);
        let item = request.items.first().unwrap();
        assert_eq!(item.product_id, 4);
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_update_status_request_parses_plain_string() {
        let request: UpdateStatusRequest =
            serde_json::from_str(r#"{"status": "shipped"}"#).unwrap();
        let status: OrderStatus = request.status.parse().unwrap();
        assert_eq!(status, OrderStatus::Shipped);
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = invalid_transition(OrderStatus::Delivered, OrderStatus::Pending);
        assert_eq!(
            err.to_string(),
            "Bad request: Invalid status transition from delivered to pending"
        );
    }
}

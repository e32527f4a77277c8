//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health             - Liveness check
//! GET  /health/ready       - Readiness check (database ping)
//!
//! # Cart (authenticated)
//! POST   /cart/add         - Add a product, incrementing when present
//! GET    /cart/my-cart     - The caller's cart with live catalog data
//! PUT    /cart/item/{id}   - Set quantity on one entry
//! DELETE /cart/item/{id}   - Remove one entry
//! DELETE /cart/clear       - Empty the cart
//!
//! # Orders
//! POST /orders/create      - Checkout (authenticated)
//! GET  /orders/my-orders   - The caller's orders, newest first
//! GET  /orders/{id}        - One order with items (owner or admin)
//! PUT  /orders/{id}/status - Advance the order lifecycle (admin)
//! GET  /orders             - All orders with usernames (admin)
//!
//! # Sales
//! GET  /sales              - Sale log with usernames (admin)
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};

use crate::state::AppState;

pub mod cart;
pub mod orders;
pub mod sales;

/// Build the API router without health endpoints or middleware.
#[must_use]
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(cart::router())
        .merge(orders::router())
        .merge(sales::router())
}

/// Build the complete application: routes, health endpoints, request IDs.
///
/// `main` wraps the result in tracing, CORS, and Sentry layers; tests drive
/// it directly with `tower::ServiceExt::oneshot`.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .layer(axum::middleware::from_fn(
            crate::middleware::request_id_middleware,
        ))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

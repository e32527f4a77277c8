//! Sale log endpoints.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::db::SaleRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::SaleWithUser;
use crate::state::AppState;

/// Build the sales router.
pub fn router() -> Router<AppState> {
    Router::new().route("/sales", get(list_all))
}

#[derive(Debug, Serialize)]
pub struct SaleListResponse {
    pub sales: Vec<SaleWithUser>,
}

/// List every recorded sale, newest first, with the buyer's username.
///
/// GET /sales
#[instrument(skip(state), fields(admin = %identity.username))]
pub async fn list_all(
    RequireAdmin(identity): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<SaleListResponse>, AppError> {
    let repo = SaleRepository::new(state.pool());
    let sales = repo.list_all().await?;

    Ok(Json(SaleListResponse { sales }))
}

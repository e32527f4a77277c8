//! Bearer authentication extractors.
//!
//! `RequireAuth` verifies the `Authorization` header and hands the handler a
//! verified [`Identity`]; `RequireAdmin` additionally applies the admin
//! capability gate. Both reject before any handler logic or storage access
//! runs, so an unauthenticated request never touches the database.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use clementine_core::{Capability, Identity};

use crate::auth::{self, AuthError};
use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;

/// Extractor that requires a verified identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(identity): RequireAuth) -> Json<Response> {
///     // identity.user_id is trusted from here on
/// }
/// ```
pub struct RequireAuth(pub Identity);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let identity = verify_bearer(parts, &state)?;
        set_sentry_user(&identity);
        Ok(Self(identity))
    }
}

/// Extractor that requires a verified identity holding the admin capability.
///
/// Rejects with 401 when the token is missing or bad, and 403 when the
/// token is fine but the caller is not an admin.
pub struct RequireAdmin(pub Identity);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let identity = verify_bearer(parts, &state)?;
        identity.require(Capability::Admin)?;
        set_sentry_user(&identity);
        Ok(Self(identity))
    }
}

/// Pull the bearer token out of the `Authorization` header and verify it.
fn verify_bearer(parts: &Parts, state: &AppState) -> Result<Identity, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?;

    Ok(auth::verify(token, state.decoding_key())?)
}

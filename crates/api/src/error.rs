//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Every error renders as a
//! JSON envelope of the form `{"message": "..."}`; server faults are
//! captured to Sentry before the response goes out.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use clementine_core::{CapabilityError, Identity};

use crate::auth::AuthError;
use crate::db::RepositoryError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request is malformed (bad JSON, invalid quantity, unknown status).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Bearer token missing, malformed, or unverifiable.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Caller is authenticated but lacks a required capability.
    #[error("Forbidden: {0}")]
    Forbidden(#[from] CapabilityError),

    /// Resource does not exist or is not visible to this caller.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    /// Malformed request bodies are a client error, not a deserialization
    /// detail, so they map to 400 rather than axum's default 422.
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    /// Status code and client-safe message for this error.
    ///
    /// Database and internal errors are deliberately vague; the detail stays
    /// in logs and Sentry.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Auth(err) => (StatusCode::UNAUTHORIZED, err.to_string()),
            Self::Forbidden(err) => (StatusCode::FORBIDDEN, err.to_string()),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            // Row-level absence surfaces as 404, not a server fault
            Self::Database(RepositoryError::NotFound) => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            Self::Database(_) | Self::Internal(_) => {
                let message = "Internal server error".to_string();
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Server faults go to Sentry with the full error; the client only
        // ever sees the scrubbed message.
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Request error");
        }

        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Attach the verified identity to the Sentry scope so errors carry the user
/// who hit them. Call after token verification.
pub fn set_sentry_user(identity: &Identity) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(identity.user_id.to_string()),
            username: Some(identity.username.clone()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use clementine_core::Capability;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn display_includes_error_class() {
        let err = AppError::NotFound("Order not found".to_string());
        assert_eq!(err.to_string(), "Not found: Order not found");

        let err = AppError::BadRequest("Quantity must be at least 1".to_string());
        assert_eq!(err.to_string(), "Bad request: Quantity must be at least 1");
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(status_of(AppError::BadRequest("bad".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::Auth(AuthError::MissingToken)), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::NotFound("gone".into())), StatusCode::NOT_FOUND);

        let denied = CapabilityError {
            required: Capability::Admin,
        };
        assert_eq!(status_of(AppError::Forbidden(denied)), StatusCode::FORBIDDEN);
    }

    #[test]
    fn server_faults_map_to_500() {
        let err = AppError::Internal("boom".into());
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::Database(RepositoryError::DataCorruption("bad row".into()));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_rows_surface_as_not_found() {
        let err = AppError::Database(RepositoryError::NotFound);
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_details_never_reach_the_client() {
        let err = AppError::Database(RepositoryError::DataCorruption("connection string".into()));
        let (_, message) = err.status_and_message();
        assert_eq!(message, "Internal server error");
    }

    #[test]
    fn capability_message_reaches_the_client() {
        let err = AppError::Forbidden(CapabilityError {
            required: Capability::Admin,
        });
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(message, "admin capability required");
    }
}

//! Application state shared across request handlers.
//!
//! Holds the loaded configuration, the connection pool, and the prepared
//! bearer token decoding key.

use std::sync::Arc;

use jsonwebtoken::DecodingKey;
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::ApiConfig;

/// Shared application state, cheap to clone via the inner `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    decoding_key: DecodingKey,
}

impl AppState {
    /// Build state from configuration and a connected pool.
    ///
    /// The token decoding key is derived from the configured secret once,
    /// here, rather than per request.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let secret = config.token_secret.expose_secret().as_bytes();
        let decoding_key = DecodingKey::from_secret(secret);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                decoding_key,
            }),
        }
    }

    /// Application configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Key for verifying bearer tokens.
    #[must_use]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }
}

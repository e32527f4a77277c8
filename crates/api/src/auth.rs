//! Bearer token verification.
//!
//! Tokens are HS256 JWTs minted by the external credential service with a
//! secret shared through `API_TOKEN_SECRET`. This module verifies and decodes
//! them into an [`Identity`]; it never issues production tokens. [`sign`]
//! exists for the CLI and tests.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use clementine_core::{Identity, UserId, UserRole};

/// Errors that can occur during bearer token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header was supplied.
    #[error("Access denied, no token provided")]
    MissingToken,

    /// The `Authorization` header is not a `Bearer` credential.
    #[error("Authorization header is not a Bearer token")]
    MalformedHeader,

    /// The token failed verification (bad signature, expired, or malformed).
    #[error("Invalid or expired token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by a bearer token.
///
/// Field names match what the credential service signs; the user ID travels
/// as `id`, not `sub`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub id: i32,
    /// Display name, denormalized into the token
    pub username: String,
    /// Role granted at sign-in
    pub role: UserRole,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

/// Verify a bearer token and produce the caller's identity.
///
/// # Errors
///
/// Returns [`AuthError::InvalidToken`] if the signature does not match, the
/// token is expired, or the payload cannot be decoded.
pub fn verify(token: &str, key: &DecodingKey) -> Result<Identity, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(token, key, &validation).map_err(AuthError::InvalidToken)?;
    let claims = data.claims;
    Ok(Identity::new(
        UserId::new(claims.id),
        claims.username,
        claims.role,
    ))
}

/// Sign a token for the given identity, valid for `ttl_secs` seconds.
///
/// Production tokens come from the credential service; this exists so the
/// CLI can mint development tokens and tests can build authenticated
/// requests.
///
/// # Errors
///
/// Returns an error if JWT encoding fails.
pub fn sign(
    identity: &Identity,
    secret: &[u8],
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        id: identity.user_id.as_i32(),
        username: identity.username.clone(),
        role: identity.role,
        iat: now,
        exp: now + ttl_secs,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"vN8p2qR5tY7wZ3xC6bM9kF4hJ1gD0sAe";

    fn identity() -> Identity {
        Identity::new(UserId::new(42), "marmalade", UserRole::User)
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let token = sign(&identity(), SECRET, 3600).unwrap();
        let verified = verify(&token, &DecodingKey::from_secret(SECRET)).unwrap();

        assert_eq!(verified.user_id, UserId::new(42));
        assert_eq!(verified.username, "marmalade");
        assert_eq!(verified.role, UserRole::User);
    }

    #[test]
    fn test_verify_preserves_admin_role() {
        let admin = Identity::new(UserId::new(1), "root", UserRole::Admin);
        let token = sign(&admin, SECRET, 3600).unwrap();
        let verified = verify(&token, &DecodingKey::from_secret(SECRET)).unwrap();

        assert_eq!(verified.role, UserRole::Admin);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = sign(&identity(), SECRET, 3600).unwrap();
        let other_key = DecodingKey::from_secret(b"uQ3mX7vB1nK5jH9fT2wL6yP0cR4gZ8sD");

        let result = verify(&token, &other_key);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // Well past the default 60 second validation leeway
        let token = sign(&identity(), SECRET, -3600).unwrap();

        let result = verify(&token, &DecodingKey::from_secret(SECRET));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let result = verify("not.a.token", &DecodingKey::from_secret(SECRET));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}

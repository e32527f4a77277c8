//! Development token minting command.
//!
//! # Usage
//!
//! ```bash
//! # Mint a user token for local API testing
//! clem-cli token --user-id 7 --username bob
//!
//! # Mint an admin token
//! clem-cli token --user-id 1 --username alice --role admin
//! ```
//!
//! # Environment Variables
//!
//! - `API_TOKEN_SECRET` - HS256 signing secret shared with the API
//!
//! Production tokens come from the credential service. This command exists
//! so local requests can be authenticated without standing that service up.

use clementine_api::auth;
use clementine_core::{Identity, UserId, UserRole};

use super::CommandError;

/// Mint a bearer token and print it to stdout.
///
/// The token itself is the only thing written to stdout, so shell
/// substitution captures it cleanly; progress lines go to stderr via
/// tracing.
///
/// # Errors
///
/// Returns an error if the role is not recognized, `API_TOKEN_SECRET` is
/// missing, or JWT encoding fails.
#[allow(clippy::print_stdout)]
pub fn mint(user_id: i32, username: &str, role: &str, ttl_secs: i64) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let role: UserRole = role
        .parse()
        .map_err(|_| CommandError::InvalidRole(role.to_owned()))?;

    let secret = std::env::var("API_TOKEN_SECRET")
        .map_err(|_| CommandError::MissingEnvVar("API_TOKEN_SECRET"))?;

    let identity = Identity::new(UserId::new(user_id), username, role);
    let token = auth::sign(&identity, secret.as_bytes(), ttl_secs)?;

    tracing::info!("Token minted for {} ({})", username, role);
    tracing::info!("  Expires in: {} seconds", ttl_secs);
    println!("{token}");

    Ok(())
}

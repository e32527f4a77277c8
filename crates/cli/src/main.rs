//! Clementine CLI - Database migrations and development tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! clem-cli migrate
//!
//! # Seed the database with demo users and products
//! clem-cli seed
//!
//! # Mint a development bearer token
//! clem-cli token --user-id 1 --username alice --role admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed database with demo data
//! - `token` - Mint a development bearer token

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "clem-cli")]
#[command(author, version, about = "Clementine CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo users and products
    Seed,
    /// Mint a development bearer token
    Token {
        /// User ID to embed in the token
        #[arg(long)]
        user_id: i32,

        /// Username to embed in the token
        #[arg(long)]
        username: String,

        /// Role to embed in the token (`user` or `admin`)
        #[arg(long, default_value = "user")]
        role: String,

        /// Token lifetime in seconds
        #[arg(long, default_value_t = 86_400)]
        ttl_secs: i64,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout is reserved for command output so
    // `TOKEN=$(clem-cli token ...)` captures only the token.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed => commands::seed::run().await,
        Commands::Token {
            user_id,
            username,
            role,
            ttl_secs,
        } => commands::token::mint(user_id, &username, &role, ttl_secs),
    }
}

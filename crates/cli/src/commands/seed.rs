//! Development seed data command.
//!
//! # Usage
//!
//! ```bash
//! clem-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `API_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! Seeds a small demo catalog plus two accounts: `alice` (admin) and `bob`
//! (user). The catalog seed is skipped when the `product` table already has
//! rows; accounts use `ON CONFLICT DO NOTHING`, so the command is safe to
//! re-run.

use clementine_api::db;
use clementine_core::{Money, UserRole};

use super::{CommandError, database_url};

/// Seed demo products and accounts into the database.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let product_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product")
        .fetch_one(&pool)
        .await?;

    if product_count > 0 {
        tracing::info!(
            "Catalog already has {} products, skipping product seed",
            product_count
        );
    } else {
        tracing::info!("Seeding demo catalog...");

        let products = [
            ("Wireless Mouse", "/images/wireless-mouse.jpg", 120, 2499),
            (
                "Mechanical Keyboard",
                "/images/mechanical-keyboard.jpg",
                45,
                8999,
            ),
            ("USB-C Hub", "/images/usb-c-hub.jpg", 80, 3999),
            ("Laptop Stand", "/images/laptop-stand.jpg", 60, 4999),
            ("Webcam", "/images/webcam.jpg", 35, 5999),
            ("Desk Lamp", "/images/desk-lamp.jpg", 90, 1999),
        ];

        for (name, image, stock, price_cents) in products {
            sqlx::query(
                r"
                INSERT INTO product (product_name, image, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(name)
            .bind(image)
            .bind(stock)
            .bind(Money::from_cents(price_cents))
            .execute(&pool)
            .await?;
        }

        tracing::info!("Seeded {} products", products.len());
    }

    tracing::info!("Seeding demo accounts...");

    let accounts = [
        ("alice", "Alice Nguyen", UserRole::Admin),
        ("bob", "Bob Okafor", UserRole::User),
    ];

    for (username, full_name, role) in accounts {
        sqlx::query(
            r"
            INSERT INTO users (username, full_name, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO NOTHING
            ",
        )
        .bind(username)
        .bind(full_name)
        .bind(role)
        .execute(&pool)
        .await?;
    }

    let seeded: Vec<(i32, String, UserRole)> = sqlx::query_as(
        r"
        SELECT id, username, role FROM users
        WHERE username IN ('alice', 'bob')
        ORDER BY id
        ",
    )
    .fetch_all(&pool)
    .await?;

    tracing::info!("Seed complete!");
    for (id, username, role) in seeded {
        tracing::info!("  {} - {} (user ID {})", username, role, id);
    }
    tracing::info!("Mint a token with: clem-cli token --user-id <ID> --username <NAME>");
    Ok(())
}

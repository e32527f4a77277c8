//! Integration tests for Clementine.
//!
//! # Running Tests
//!
//! ```bash
//! # Fast tests: drive the router in-process, no database needed
//! cargo test -p clementine-integration-tests
//!
//! # Database tests: need PostgreSQL with migrations applied
//! cargo run -p clementine-cli -- migrate
//! cargo test -p clementine-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `http_api` - Routing, authentication, and validation, driven through
//!   `tower::ServiceExt::oneshot` without a live database
//! - `checkout_flow` - Checkout, cart, and order lifecycle against a real
//!   `PostgreSQL` database

//! Clementine Core - Shared types library.
//!
//! This crate provides common types used across all Clementine components:
//! - `api` - The storefront checkout and order HTTP service
//! - `cli` - Command-line tools for migrations and development fixtures
//!
//! # Architecture
//!
//! The core crate contains only types and pure predicates - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and money, status enums,
//!   and the identity capability gate

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

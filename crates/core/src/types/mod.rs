//! Core types for Clementine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod identity;
pub mod money;
pub mod status;

pub use id::*;
pub use identity::{Capability, CapabilityError, Identity};
pub use money::Money;
pub use status::*;

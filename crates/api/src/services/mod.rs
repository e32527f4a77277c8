//! Business logic services.

pub mod checkout;

pub use checkout::CheckoutService;

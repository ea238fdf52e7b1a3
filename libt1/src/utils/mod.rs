//! Utilities for libt1: small, reusable helpers used across the crate.

/// Hex formatting
pub mod hex;
/// Timeout arithmetic
pub mod timeout;

pub use hex::*;
pub use timeout::*;

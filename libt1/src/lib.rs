// libt1/src/lib.rs

//! libt1
//!
//! ISO/IEC 7816-3 T=1 block transport for secure elements on SPI-like
//! buses. One framing and rule engine is shared by every backend
//! implementing [`Transport`].
#![warn(missing_docs)]

/// Protocol options and preprocessing hooks
pub mod config;
/// Wire sizes, thresholds and error codes
pub mod constants;
/// Rule engine and exchange loop
pub mod engine;
/// Error type and numeric codes
pub mod error;
/// Caller-facing handles
pub mod interface;
/// Single-block send and receive
pub mod link;
/// Commonly used types
pub mod prelude;
/// Block layout: PCB, frame and LRC
pub mod protocol;
/// Helpers for scripting a card in tests
pub mod test_support;
/// Backends and the hardware contract
pub mod transport;
/// Small protocol newtypes
pub mod types;
/// Hex and timeout helpers
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;

// libt1/src/interface/mod.rs

/// Builder for an [`Interface`]
pub mod builder;
/// Type-state interface handle
pub mod handle;
/// Thread-safe and async wrappers
pub mod shared;

pub use builder::InterfaceBuilder;
pub use handle::{Closed, Interface, Open};
#[cfg(feature = "async")]
pub use shared::AsyncInterface;
pub use shared::SharedInterface;

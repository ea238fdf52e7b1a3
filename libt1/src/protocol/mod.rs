// libt1/src/protocol/mod.rs

/// Longitudinal redundancy check
pub mod checksum;
/// Fixed-size block buffer
pub mod frame;
/// Protocol control byte
pub mod pcb;

pub use checksum::lrc;
pub use frame::Frame;
pub use pcb::{Pcb, Received, SuperKind, pcb_name};

// libt1/src/prelude.rs

pub use crate::config::ProtocolOptions;
pub use crate::engine::SequenceState;
pub use crate::interface::{Closed, Interface, InterfaceBuilder, Open, SharedInterface};
pub use crate::protocol::{Frame, Pcb, SuperKind};
pub use crate::transport::{EchoTransport, FakeTransport, MockTransport, PollStatus, Transport};
pub use crate::{Direction, Error, ErrorReport, Ifs, Result, WaitMultiplier};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, ms};

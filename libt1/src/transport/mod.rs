// libt1/src/transport/mod.rs

/// Loopback endpoint
pub mod echo;
/// Transaction-discipline validator
pub mod fake;
/// Scripted peer for tests
pub mod mock;
/// The [`Transport`] contract
pub mod traits;

pub use echo::EchoTransport;
pub use fake::FakeTransport;
pub use mock::{MockTransport, Reply};
pub use traits::{PollStatus, Transport};

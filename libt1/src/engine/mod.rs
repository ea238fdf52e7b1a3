// libt1/src/engine/mod.rs

//! T=1 exchange engine: session state, the rule table and the loop that
//! drives a transport with them.

/// Exchange loop driving one transceive
pub mod exchange;
/// Decision table for (sent, received) pairs
pub mod rules;
/// Sequence and per-exchange state
pub mod state;

pub use exchange::{Opening, run};
pub use rules::{BlockError, Outcome, check_block, evaluate};
pub use state::{ExchangeState, SequenceState};

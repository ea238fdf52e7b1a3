// libt1/src/config.rs

//! Protocol options for an open interface.
//!
//! Options are fixed for the lifetime of an open session. Backends provide
//! their own defaults through `Transport::protocol_options`; callers can
//! override them when building an interface.

use std::fmt;
use std::time::Duration;

use crate::protocol::Frame;
use crate::types::Direction;
use crate::{Error, Result};

/// Hook run on every frame right before transmit and right after receive.
/// Used by backends whose checksum or addressing conventions differ from
/// the default.
pub type Preprocess = fn(&ProtocolOptions, &mut Frame, Direction);

/// Default NAD this side listens for
pub const DEFAULT_HOST_ADDRESS: u8 = 0xA5;
/// Default NAD this side transmits with
pub const DEFAULT_NODE_ADDRESS: u8 = 0x5A;
/// Default block waiting time
pub const DEFAULT_BWT: Duration = Duration::from_micros(1_624_000);
/// Default elementary time unit (one character is roughly 7 ETU on SPI)
pub const DEFAULT_ETU: Duration = Duration::from_micros(1_050);

/// Addressing and timing used by an open interface.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProtocolOptions {
    /// NAD to listen for
    pub host_address: u8,
    /// NAD to send with
    pub node_address: u8,
    /// Block waiting time
    pub bwt: Duration,
    /// Elementary time unit
    pub etu: Duration,
    /// Hook run on every frame, see [`Preprocess`]
    #[cfg_attr(feature = "serde", serde(skip))]
    pub preprocess: Option<Preprocess>,
}

impl Default for ProtocolOptions {
    fn default() -> Self {
        Self {
            host_address: DEFAULT_HOST_ADDRESS,
            node_address: DEFAULT_NODE_ADDRESS,
            bwt: DEFAULT_BWT,
            etu: DEFAULT_ETU,
            preprocess: None,
        }
    }
}

impl ProtocolOptions {
    /// Default timing with the given addresses.
    pub fn new(host_address: u8, node_address: u8) -> Self {
        Self {
            host_address,
            node_address,
            ..Self::default()
        }
    }

    /// Set the block waiting time.
    pub fn with_bwt(mut self, bwt: Duration) -> Self {
        self.bwt = bwt;
        self
    }

    /// Set the elementary time unit.
    pub fn with_etu(mut self, etu: Duration) -> Self {
        self.etu = etu;
        self
    }

    /// Install a preprocessing hook.
    pub fn with_preprocess(mut self, hook: Preprocess) -> Self {
        self.preprocess = Some(hook);
        self
    }

    /// Character time used by polling backends (7 ETU per byte).
    pub fn character_time(&self) -> Duration {
        self.etu * 7
    }

    /// Run the preprocess hook if one is configured.
    pub fn preprocess(&self, frame: &mut Frame, direction: Direction) {
        if let Some(hook) = self.preprocess {
            hook(self, frame, direction);
        }
    }

    /// Reject options no exchange could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.bwt.is_zero() {
            return Err(Error::Config("block waiting time must be non-zero".into()));
        }
        if self.etu.is_zero() {
            return Err(Error::Config("elementary time unit must be non-zero".into()));
        }
        if self.etu > self.bwt {
            return Err(Error::Config(format!(
                "elementary time unit {:?} exceeds block waiting time {:?}",
                self.etu, self.bwt
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ProtocolOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolOptions")
            .field("host_address", &format_args!("{:#04x}", self.host_address))
            .field("node_address", &format_args!("{:#04x}", self.node_address))
            .field("bwt", &self.bwt)
            .field("etu", &self.etu)
            .field("preprocess", &self.preprocess.is_some())
            .finish()
    }
}

/// Preprocess hook for cards that compute the LRC as if NAD were 0x00.
///
/// Outbound frames get their LRC recomputed with a zero NAD; inbound frames
/// have their NAD replaced by 0x00 so the regular LRC check passes.
pub fn zero_nad_checksum(options: &ProtocolOptions, frame: &mut Frame, direction: Direction) {
    match direction {
        Direction::Transmit => {
            frame.set_nad(0x00);
            frame.seal();
            frame.set_nad(options.node_address);
            log::trace!("preprocessed outbound frame with zero NAD checksum");
        }
        Direction::Receive => {
            if frame.nad() != options.host_address {
                log::trace!("rewriting from unknown NAD {:#04x}", frame.nad());
            }
            frame.set_nad(0x00);
        }
    }
}

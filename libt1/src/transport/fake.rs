// libt1/src/transport/fake.rs

//! Validation-only backend.
//!
//! Moves no data. It tracks whether the last receive and transmit calls
//! released the bus transaction and reports an error whenever a caller
//! starts one direction while the other is still open. Only polls for
//! `FakeTransport::NAD` ever match.

use std::time::Duration;

use crate::config::ProtocolOptions;
use crate::transport::traits::{PollStatus, Transport};
use crate::{Error, Result};

/// Fake backend errors. Codes 0..=2 are reserved for T=1 terminal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeError {
    /// `close` while a transaction is held
    ClosedMidTransfer,
    /// Receive or poll while a transmit is unfinished
    ReceiveDuringTransmit,
    /// Transmit while a receive is unfinished
    TransmitDuringReceive,
    /// Used before `open`
    NotOpen,
}

impl FakeError {
    /// Backend-scoped code, never in the terminal range 0..=2.
    pub fn code(self) -> i32 {
        match self {
            FakeError::ClosedMidTransfer => 3,
            FakeError::ReceiveDuringTransmit => 4,
            FakeError::TransmitDuringReceive => 5,
            FakeError::NotOpen => 6,
        }
    }

    /// Human readable description.
    pub fn message(self) -> &'static str {
        match self {
            FakeError::ClosedMidTransfer => "interface closed without finishing transmission",
            FakeError::ReceiveDuringTransmit => "receive called without completing transmission",
            FakeError::TransmitDuringReceive => "transmit called without completing reception",
            FakeError::NotOpen => "fake interface is not open",
        }
    }
}

impl From<FakeError> for Error {
    fn from(err: FakeError) -> Self {
        Error::Hardware {
            backend: FakeTransport::NAME,
            code: err.code(),
            message: err.message().to_string(),
        }
    }
}

/// Backend-owned transaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FakeState {
    rx_complete: bool,
    tx_complete: bool,
}

/// Backend that checks the `complete` discipline and moves no data.
#[derive(Debug, Default)]
pub struct FakeTransport {
    state: Option<FakeState>,
}

impl FakeTransport {
    /// Backend name
    pub const NAME: &'static str = "fake";
    /// The only NAD a poll will match.
    pub const NAD: u8 = 0xAD;

    /// Closed fake backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&mut self) -> Result<&mut FakeState> {
        self.state.as_mut().ok_or_else(|| FakeError::NotOpen.into())
    }

    /// True when neither direction holds the bus.
    pub fn is_idle(&self) -> bool {
        matches!(
            self.state,
            Some(FakeState {
                rx_complete: true,
                tx_complete: true
            })
        )
    }
}

impl Transport for FakeTransport {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn protocol_options(&self) -> ProtocolOptions {
        ProtocolOptions::new(Self::NAD, 0xDA).with_bwt(Duration::from_millis(10))
    }

    fn open(&mut self) -> Result<()> {
        self.state = Some(FakeState {
            rx_complete: true,
            tx_complete: true,
        });
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let state = *self.state()?;
        if !state.rx_complete || !state.tx_complete {
            return Err(FakeError::ClosedMidTransfer.into());
        }
        self.state = None;
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8], complete: bool) -> Result<usize> {
        let state = self.state()?;
        if !state.tx_complete {
            return Err(FakeError::ReceiveDuringTransmit.into());
        }
        state.rx_complete = complete;
        Ok(buf.len())
    }

    fn transmit(&mut self, data: &[u8], complete: bool) -> Result<usize> {
        let state = self.state()?;
        if !state.rx_complete {
            return Err(FakeError::TransmitDuringReceive.into());
        }
        state.tx_complete = complete;
        Ok(data.len())
    }

    fn poll(&mut self, nad: u8, timeout: Duration, complete: bool) -> Result<PollStatus> {
        let state = self.state()?;
        // Poll begins a receive train, so transmission must be complete.
        if !state.tx_complete {
            return Err(FakeError::ReceiveDuringTransmit.into());
        }
        if timeout.is_zero() {
            return Ok(PollStatus::TimedOut);
        }
        state.rx_complete = complete;
        if nad == Self::NAD {
            Ok(PollStatus::Matched)
        } else {
            Ok(PollStatus::TimedOut)
        }
    }
}

// libt1/src/transport/traits.rs

use std::time::Duration;

use derive_more::Display;

use crate::config::ProtocolOptions;
use crate::{Error, Result};

/// Result of polling the bus for the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PollStatus {
    /// The awaited NAD was seen and consumed.
    #[display(fmt = "matched")]
    Matched,
    /// Nothing matching arrived within the timeout.
    #[display(fmt = "timed out")]
    TimedOut,
}

/// Transport trait abstracts the physical bus away from the T=1 engine.
///
/// Raw receive and transmit calls may compose one frame out of several
/// calls sharing one bus transaction (chip-select held on SPI). The
/// transaction is released only after a call with `complete` set.
pub trait Transport {
    /// Human readable backend name
    fn name(&self) -> &'static str;

    /// Options the backend expects the T=1 engine to use by default
    fn protocol_options(&self) -> ProtocolOptions {
        ProtocolOptions::default()
    }

    /// Prepare backend state for communication
    fn open(&mut self) -> Result<()>;

    /// Release backend resources
    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    /// Receive raw bytes into `buf`, returning how many were read
    fn receive(&mut self, buf: &mut [u8], complete: bool) -> Result<usize>;

    /// Transmit raw bytes, returning how many were sent
    fn transmit(&mut self, data: &[u8], complete: bool) -> Result<usize>;

    /// Poll the bus until `nad` is seen or `timeout` expires
    fn poll(&mut self, nad: u8, timeout: Duration, complete: bool) -> Result<PollStatus>;

    /// Power-cycle or otherwise hard reset the secure element. Backends
    /// without reset capability keep the default.
    fn reset(&mut self) -> Result<()> {
        Err(Error::UnsupportedOperation(format!(
            "{} has no hardware reset",
            self.name()
        )))
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn protocol_options(&self) -> ProtocolOptions {
        (**self).protocol_options()
    }

    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn receive(&mut self, buf: &mut [u8], complete: bool) -> Result<usize> {
        (**self).receive(buf, complete)
    }

    fn transmit(&mut self, data: &[u8], complete: bool) -> Result<usize> {
        (**self).transmit(data, complete)
    }

    fn poll(&mut self, nad: u8, timeout: Duration, complete: bool) -> Result<PollStatus> {
        (**self).poll(nad, timeout, complete)
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
}

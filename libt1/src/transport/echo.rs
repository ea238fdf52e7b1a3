// libt1/src/transport/echo.rs

//! In-memory T=1 echo endpoint.
//!
//! Every frame the interface transmits is validated and reflected back
//! unchanged on the next poll. Like some real cards, the echo endpoint
//! computes checksums as if the NAD were 0x00, so it ships with the
//! `zero_nad_checksum` preprocess hook.

use std::time::Duration;

use crate::config::{ProtocolOptions, zero_nad_checksum};
use crate::constants::FRAME_MAX_LEN;
use crate::protocol::checksum::lrc;
use crate::transport::traits::{PollStatus, Transport};
use crate::utils::poll_intervals;
use crate::{Error, Result};

/// Echo backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoError {
    /// More bytes were transmitted than one frame can hold.
    Overflow,
    /// The endpoint was used before `open`.
    NotOpen,
}

impl From<EchoError> for Error {
    fn from(err: EchoError) -> Self {
        let (code, message) = match err {
            EchoError::Overflow => (3, "transmitted more than one frame"),
            EchoError::NotOpen => (4, "echo endpoint is not open"),
        };
        Error::Hardware {
            backend: EchoTransport::NAME,
            code,
            message: message.to_string(),
        }
    }
}

/// Reflects each valid frame back to the interface.
#[derive(Debug, Default)]
pub struct EchoTransport {
    open: bool,
    inbox: Vec<u8>,
    outbox: Option<Vec<u8>>,
    read_pos: usize,
}

impl EchoTransport {
    /// Backend name
    pub const NAME: &'static str = "echo";

    /// Closed echo endpoint.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(EchoError::NotOpen.into())
        }
    }
}

impl Transport for EchoTransport {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn protocol_options(&self) -> ProtocolOptions {
        ProtocolOptions::new(0xAA, 0xBB)
            .with_bwt(Duration::from_millis(3))
            .with_etu(Duration::from_micros(1))
            .with_preprocess(zero_nad_checksum)
    }

    fn open(&mut self) -> Result<()> {
        self.open = true;
        self.inbox.clear();
        self.outbox = None;
        self.read_pos = 0;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8], complete: bool) -> Result<usize> {
        self.ensure_open()?;
        log::trace!("interface attempting to read data");
        let Some(frame) = self.outbox.as_ref() else {
            return Ok(0);
        };
        let available = &frame[self.read_pos.min(frame.len())..];
        let read = available.len().min(buf.len());
        buf[..read].copy_from_slice(&available[..read]);
        self.read_pos += read;
        if complete {
            self.outbox = None;
            self.read_pos = 0;
            log::trace!("card sent a frame");
        }
        Ok(read)
    }

    fn transmit(&mut self, data: &[u8], complete: bool) -> Result<usize> {
        self.ensure_open()?;
        if self.inbox.len() + data.len() > FRAME_MAX_LEN {
            self.inbox.clear();
            return Err(EchoError::Overflow.into());
        }
        self.inbox.extend_from_slice(data);
        if complete {
            let mut frame = std::mem::take(&mut self.inbox);
            if let Some(nad) = frame.first_mut() {
                *nad = 0x00;
            }
            match frame.split_last() {
                Some((&check, body)) if lrc(body) == check => {
                    log::trace!("card received valid frame");
                    self.outbox = Some(frame);
                    self.read_pos = 0;
                }
                _ => log::debug!("card received frame with bad LRC, dropping it"),
            }
        }
        Ok(data.len())
    }

    fn poll(&mut self, nad: u8, timeout: Duration, complete: bool) -> Result<PollStatus> {
        self.ensure_open()?;
        let options = self.protocol_options();
        log::trace!(
            "interface polling for start of frame: {:#04x} ({} character times)",
            nad,
            poll_intervals(timeout, options.character_time())
        );
        if nad != options.host_address || self.outbox.is_none() {
            return Ok(PollStatus::TimedOut);
        }
        if !complete {
            // NAD consumed by the poll
            self.read_pos = 1;
        }
        Ok(PollStatus::Matched)
    }
}

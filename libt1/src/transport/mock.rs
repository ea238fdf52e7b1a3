// libt1/src/transport/mock.rs

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::ProtocolOptions;
use crate::protocol::{Frame, Pcb};
use crate::transport::traits::{PollStatus, Transport};
use crate::{Error, Result};

/// Failures the mock can inject, with backend-scoped codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFault {
    /// The bus read failed while polling.
    Bus,
    /// The reset line could not be toggled.
    ResetLine,
}

impl MockFault {
    /// Backend-scoped error code.
    pub fn code(self) -> i32 {
        match self {
            MockFault::Bus => 3,
            MockFault::ResetLine => 4,
        }
    }

    /// Human readable description.
    pub fn message(self) -> &'static str {
        match self {
            MockFault::Bus => "bus read failed",
            MockFault::ResetLine => "unable to toggle reset line",
        }
    }
}

impl From<MockFault> for Error {
    fn from(fault: MockFault) -> Self {
        Error::Hardware {
            backend: MockTransport::NAME,
            code: fault.code(),
            message: fault.message().to_string(),
        }
    }
}

/// One scripted peer reaction, consumed by the next poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Complete wire frame, NAD first
    Frame(Vec<u8>),
    /// Poll times out
    Silence,
    /// Poll fails with a backend error
    Fault(MockFault),
    /// Poll matches, then the first read fails
    ReadFault(MockFault),
}

/// Mock transport for unit tests. It records transmitted frames and plays
/// back queued peer replies.
#[derive(Debug)]
pub struct MockTransport {
    /// Every complete frame transmitted, in order
    pub sent: Vec<Vec<u8>>,
    /// Replies still to be played back
    pub replies: VecDeque<Reply>,
    /// Timeout passed to each poll
    pub poll_timeouts: Vec<Duration>,
    /// Number of successful hardware resets
    pub resets: usize,
    /// Whether `reset` is available
    pub reset_supported: bool,
    /// Testing hook: number of resets that should fail
    pub reset_failures: usize,
    /// Whether `open` was called more recently than `close`
    pub opened: bool,
    /// A receive train was started and not yet completed
    pub transaction_open: bool,
    options: ProtocolOptions,
    pending_tx: Vec<u8>,
    current: Option<(Vec<u8>, usize)>,
    read_fault: Option<MockFault>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Backend name
    pub const NAME: &'static str = "mock";

    /// Mock with default addresses and a short BWT.
    pub fn new() -> Self {
        Self::with_options(ProtocolOptions::default().with_bwt(Duration::from_millis(10)))
    }

    /// Mock reporting `options` as its defaults.
    pub fn with_options(options: ProtocolOptions) -> Self {
        Self {
            sent: Vec::new(),
            replies: VecDeque::new(),
            poll_timeouts: Vec::new(),
            resets: 0,
            reset_supported: false,
            reset_failures: 0,
            opened: false,
            transaction_open: false,
            options,
            pending_tx: Vec::new(),
            current: None,
            read_fault: None,
        }
    }

    /// Allow hardware resets.
    pub fn with_reset(mut self) -> Self {
        self.reset_supported = true;
        self
    }

    /// Queue one reply.
    pub fn push_reply(&mut self, reply: Reply) {
        self.replies.push_back(reply);
    }

    /// Queue a well-formed frame addressed to this side.
    pub fn push_frame(&mut self, pcb: Pcb, inf: &[u8]) -> Result<()> {
        let bytes = Frame::encode(self.options.host_address, pcb, inf)?;
        self.replies.push_back(Reply::Frame(bytes));
        Ok(())
    }

    /// Queue `count` timeouts.
    pub fn push_silence(&mut self, count: usize) {
        for _ in 0..count {
            self.replies.push_back(Reply::Silence);
        }
    }

    /// PCBs of the transmitted frames, in order.
    pub fn sent_pcbs(&self) -> Vec<Pcb> {
        self.sent
            .iter()
            .filter_map(|f| f.get(1).copied())
            .map(Pcb::from_byte)
            .collect()
    }

    /// Decoded transmitted frames. Frames failing the LRC check are skipped.
    pub fn sent_frames(&self) -> Vec<Frame> {
        self.sent
            .iter()
            .filter_map(|f| Frame::decode(f).ok())
            .collect()
    }
}

impl Transport for MockTransport {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn protocol_options(&self) -> ProtocolOptions {
        self.options
    }

    fn open(&mut self) -> Result<()> {
        self.opened = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.opened = false;
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8], complete: bool) -> Result<usize> {
        if !buf.is_empty() {
            if let Some(fault) = self.read_fault.take() {
                return Err(fault.into());
            }
        }
        let mut read = 0;
        if let Some((bytes, pos)) = self.current.as_mut() {
            let available = &bytes[*pos..];
            read = available.len().min(buf.len());
            buf[..read].copy_from_slice(&available[..read]);
            *pos += read;
        }
        if complete {
            self.current = None;
            self.read_fault = None;
            self.transaction_open = false;
        }
        Ok(read)
    }

    fn transmit(&mut self, data: &[u8], complete: bool) -> Result<usize> {
        self.pending_tx.extend_from_slice(data);
        if complete {
            self.sent.push(std::mem::take(&mut self.pending_tx));
        }
        Ok(data.len())
    }

    fn poll(&mut self, nad: u8, timeout: Duration, complete: bool) -> Result<PollStatus> {
        self.poll_timeouts.push(timeout);
        match self.replies.pop_front() {
            Some(Reply::Frame(bytes)) if bytes.first() == Some(&nad) => {
                // NAD consumed by the poll
                self.current = Some((bytes, 1));
                self.transaction_open = !complete;
                Ok(PollStatus::Matched)
            }
            Some(Reply::ReadFault(fault)) => {
                self.read_fault = Some(fault);
                self.transaction_open = !complete;
                Ok(PollStatus::Matched)
            }
            Some(Reply::Frame(_)) | Some(Reply::Silence) | None => Ok(PollStatus::TimedOut),
            Some(Reply::Fault(fault)) => Err(fault.into()),
        }
    }

    fn reset(&mut self) -> Result<()> {
        if !self.reset_supported {
            return Err(Error::UnsupportedOperation("mock has no hardware reset".into()));
        }
        if self.reset_failures > 0 {
            self.reset_failures -= 1;
            return Err(MockFault::ResetLine.into());
        }
        self.resets += 1;
        Ok(())
    }
}

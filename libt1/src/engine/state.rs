// libt1/src/engine/state.rs

use crate::protocol::{Frame, Pcb};
use crate::types::{Ifs, WaitMultiplier};

/// Sequence toggles that persist for the lifetime of an open interface.
///
/// Both sides start at 1 so the first I-block each side sends carries 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceState {
    /// Sequence bit of the last I-block this side sent
    pub host: bool,
    /// Sequence bit of the last I-block the card sent
    pub card: bool,
}

impl Default for SequenceState {
    fn default() -> Self {
        Self {
            host: true,
            card: true,
        }
    }
}

impl SequenceState {
    /// Sequence bit the next I-block of this side carries.
    pub fn next_host(&self) -> bool {
        !self.host
    }

    /// Back to the state of a fresh session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Working state of one exchange: application data cursors, IFS, pending
/// WTX multiplier and error counters. Discarded when the exchange ends.
#[derive(Debug)]
pub struct ExchangeState<'a> {
    tx: &'a [u8],
    tx_pos: usize,
    rx: &'a mut [u8],
    rx_pos: usize,
    /// Largest INF this side sends per block
    pub ifs: Ifs,
    /// Multiplier applied to the next receive timeout
    pub wait_mult: WaitMultiplier,
    /// Errors since the last forward step
    pub errors: u32,
    /// Retransmissions of the current reference block
    pub retransmits: u32,
    /// Description of the most recent error
    pub last_error: Option<String>,
}

impl<'a> ExchangeState<'a> {
    /// State for sending `tx` and collecting the response into `rx`.
    pub fn new(tx: &'a [u8], rx: &'a mut [u8]) -> Self {
        Self {
            tx,
            tx_pos: 0,
            rx,
            rx_pos: 0,
            ifs: Ifs::DEFAULT,
            wait_mult: WaitMultiplier::ONE,
            errors: 0,
            retransmits: 0,
            last_error: None,
        }
    }

    /// Roll back to the state the exchange started with.
    pub fn rewind(&mut self) {
        self.tx_pos = 0;
        self.rx_pos = 0;
        self.ifs = Ifs::DEFAULT;
        self.wait_mult = WaitMultiplier::ONE;
        self.errors = 0;
        self.retransmits = 0;
        self.last_error = None;
    }

    /// Clear the counters after a forward step.
    pub fn reset_counters(&mut self) {
        self.errors = 0;
        self.retransmits = 0;
    }

    /// Application bytes not yet placed in an I-block.
    pub fn tx_remaining(&self) -> usize {
        self.tx.len() - self.tx_pos
    }

    /// Application bytes written to the receive buffer so far.
    pub fn received(&self) -> usize {
        self.rx_pos
    }

    /// Turn `frame` into the next I-block with sequence `seq`, carrying up
    /// to IFS bytes of outstanding application data. The more-data bit is
    /// set while data remains after this block.
    pub fn fill_info_block(&mut self, frame: &mut Frame, seq: bool) -> usize {
        let limit = self.ifs.as_usize().min(self.tx_remaining());
        let copied = frame.load_inf(&self.tx[self.tx_pos..self.tx_pos + limit]);
        self.tx_pos += copied;
        frame.set_pcb(Pcb::info(seq, self.tx_remaining() > 0));
        log::trace!("copying {} bytes of app data for transmission", copied);
        copied
    }

    /// Append the INF of a received I-block to the receive buffer. Bytes
    /// beyond its capacity are dropped.
    pub fn take_app_data(&mut self, frame: &Frame) -> usize {
        if !frame.pcb().is_info() {
            return 0;
        }
        let inf = frame.inf();
        let room = self.rx.len() - self.rx_pos;
        let taken = inf.len().min(room);
        if taken < inf.len() {
            log::warn!(
                "receive buffer full, dropping {} of {} bytes",
                inf.len() - taken,
                inf.len()
            );
        }
        self.rx[self.rx_pos..self.rx_pos + taken].copy_from_slice(&inf[..taken]);
        self.rx_pos += taken;
        taken
    }
}

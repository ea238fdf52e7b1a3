// libt1/src/protocol/frame.rs

use std::fmt;

use crate::constants::{FRAME_MAX_LEN, HEADER_LEN, INF_LEN, LEN_INVALID, PCB_INVALID};
use crate::protocol::checksum::lrc;
use crate::protocol::pcb::{Pcb, Received};
use crate::{Error, Result};

const NAD_IDX: usize = 0;
const PCB_IDX: usize = 1;
const LEN_IDX: usize = 2;

/// T=1 block in a fixed-size buffer.
/// Format: [NAD(1)] [PCB(1)] [LEN(1)] [INF(LEN)] [LRC(1)]
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; FRAME_MAX_LEN],
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            buf: [0u8; FRAME_MAX_LEN],
        }
    }
}

impl Frame {
    /// Empty block with the given PCB.
    pub fn new(pcb: Pcb) -> Self {
        let mut frame = Self::default();
        frame.set_pcb(pcb);
        frame
    }

    /// Block with the given PCB and information field.
    pub fn with_inf(pcb: Pcb, inf: &[u8]) -> Result<Self> {
        let mut frame = Self::new(pcb);
        frame.set_inf(inf)?;
        Ok(frame)
    }

    /// Encode a complete wire frame, LRC included.
    pub fn encode(nad: u8, pcb: Pcb, inf: &[u8]) -> Result<Vec<u8>> {
        let mut frame = Self::with_inf(pcb, inf)?;
        frame.set_nad(nad);
        frame.seal();
        Ok(frame.as_bytes().to_vec())
    }

    /// Decode a complete wire frame and verify its LRC.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN + 1 {
            return Err(Error::InvalidLength {
                expected: HEADER_LEN + 1,
                actual: bytes.len(),
            });
        }
        let len = bytes[LEN_IDX];
        if len == LEN_INVALID {
            return Err(Error::FrameFormat("LEN 255 is reserved".into()));
        }
        let required = HEADER_LEN + len as usize + 1;
        if bytes.len() != required {
            return Err(Error::InvalidLength {
                expected: required,
                actual: bytes.len(),
            });
        }

        let mut frame = Self::default();
        frame.buf[..required].copy_from_slice(bytes);
        let expected = frame.compute_lrc();
        let actual = frame.lrc();
        if expected != actual {
            return Err(Error::ChecksumMismatch { expected, actual });
        }
        Ok(frame)
    }

    /// Node address byte.
    pub fn nad(&self) -> u8 {
        self.buf[NAD_IDX]
    }

    /// Set the node address byte.
    pub fn set_nad(&mut self, nad: u8) {
        self.buf[NAD_IDX] = nad;
    }

    /// Raw PCB byte, including the invalid sentinel.
    pub fn pcb_byte(&self) -> u8 {
        self.buf[PCB_IDX]
    }

    /// Store a raw PCB byte.
    pub fn set_pcb_byte(&mut self, byte: u8) {
        self.buf[PCB_IDX] = byte;
    }

    /// Decoded PCB.
    pub fn pcb(&self) -> Pcb {
        Pcb::from_byte(self.pcb_byte())
    }

    /// Store an encoded PCB.
    pub fn set_pcb(&mut self, pcb: Pcb) {
        self.set_pcb_byte(pcb.to_byte());
    }

    /// Classification used by the rule engine.
    pub fn received(&self) -> Received {
        Received::from_byte(self.pcb_byte())
    }

    /// Raw LEN byte.
    pub fn len(&self) -> u8 {
        self.buf[LEN_IDX]
    }

    /// Set LEN without touching INF.
    pub fn set_len(&mut self, len: u8) {
        self.buf[LEN_IDX] = len;
    }

    /// True when LEN is 0.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn inf_len(&self) -> usize {
        (self.len() as usize).min(INF_LEN)
    }

    /// Information field (clamped to INF_LEN).
    pub fn inf(&self) -> &[u8] {
        &self.buf[HEADER_LEN..HEADER_LEN + self.inf_len()]
    }

    /// Replace the information field and LEN.
    pub fn set_inf(&mut self, inf: &[u8]) -> Result<()> {
        if inf.len() > INF_LEN {
            return Err(Error::InvalidLength {
                expected: INF_LEN,
                actual: inf.len(),
            });
        }
        self.buf[HEADER_LEN..HEADER_LEN + inf.len()].copy_from_slice(inf);
        self.set_len(inf.len() as u8);
        Ok(())
    }

    /// Copy as much of `src` as one block holds and set LEN accordingly.
    pub(crate) fn load_inf(&mut self, src: &[u8]) -> usize {
        let len = src.len().min(INF_LEN);
        self.buf[HEADER_LEN..HEADER_LEN + len].copy_from_slice(&src[..len]);
        self.set_len(len as u8);
        len
    }

    /// First INF byte, the value of IFS and WTX blocks.
    pub fn inf_byte(&self) -> Option<u8> {
        self.inf().first().copied()
    }

    /// Mutable view of PCB and LEN, filled by the link layer.
    pub(crate) fn header_tail_mut(&mut self) -> &mut [u8] {
        &mut self.buf[PCB_IDX..HEADER_LEN]
    }

    /// Mutable view of INF plus LRC for a block of `len` INF bytes.
    pub(crate) fn body_mut(&mut self, len: usize) -> &mut [u8] {
        let len = len.min(INF_LEN);
        &mut self.buf[HEADER_LEN..HEADER_LEN + len + 1]
    }

    fn lrc_idx(&self) -> usize {
        HEADER_LEN + self.inf_len()
    }

    /// Stored LRC byte.
    pub fn lrc(&self) -> u8 {
        self.buf[self.lrc_idx()]
    }

    /// LRC over header and INF as currently held.
    pub fn compute_lrc(&self) -> u8 {
        lrc(&self.buf[..self.lrc_idx()])
    }

    /// Store the computed LRC in the trailer.
    pub fn seal(&mut self) {
        let idx = self.lrc_idx();
        self.buf[idx] = self.compute_lrc();
    }

    /// True when LEN is in range and the trailer matches the contents.
    pub fn checksum_ok(&self) -> bool {
        (self.len() as usize) <= INF_LEN && self.compute_lrc() == self.lrc()
    }

    /// Fill the frame with the "no valid block" sentinel.
    pub fn invalidate(&mut self) {
        self.buf.fill(PCB_INVALID);
    }

    /// True after [`Frame::invalidate`].
    pub fn is_invalid(&self) -> bool {
        self.pcb_byte() == PCB_INVALID
    }

    /// Zero the header so the frame can be prepared as the next block.
    pub fn clear_header(&mut self) {
        self.buf[..HEADER_LEN].fill(0);
    }

    /// Header, INF and trailer as sent on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.lrc_idx() + 1]
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("nad", &format_args!("{:#04x}", self.nad()))
            .field("pcb", &format_args!("{}", self.received()))
            .field("len", &self.len())
            .field("inf", &crate::utils::bytes_to_hex_spaced(self.inf()))
            .finish()
    }
}

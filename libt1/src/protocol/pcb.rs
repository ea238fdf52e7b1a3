// libt1/src/protocol/pcb.rs

//! Protocol control byte (PCB).
//!
//! The PCB shares one byte between three kind-dependent layouts. The top two
//! bits select the kind:
//!
//! ```text
//! I-block  0 S M 0 0 0 0 0    S = send sequence, M = more data
//! R-block  1 0 0 N 0 0 O P    N = next sequence, O = other error, P = parity error
//! S-block  1 1 R 0 0 0 T T    R = response, TT = RESYNC / IFS / ABORT / WTX
//! ```
//!
//! Decoding is total: every byte maps to some `Pcb`, reserved bits are
//! ignored. Encoding is exact, so only canonical bytes round-trip.

use std::fmt;

use crate::constants::PCB_INVALID;

const KIND_MASK: u8 = 0xC0;
const KIND_R: u8 = 0x80;
const KIND_S: u8 = 0xC0;

const I_SEQ_BIT: u8 = 1 << 6;
const I_MORE_BIT: u8 = 1 << 5;

const R_SEQ_BIT: u8 = 1 << 4;
const R_OTHER_BIT: u8 = 1 << 1;
const R_PARITY_BIT: u8 = 1;

const S_RESPONSE_BIT: u8 = 1 << 5;
const S_TYPE_MASK: u8 = 0x03;

/// Supervisory block sub-type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuperKind {
    /// Reset sequence state
    Resync,
    /// Information field size
    Ifs,
    /// Abandon the current chain
    Abort,
    /// Waiting time extension
    Wtx,
}

impl SuperKind {
    fn from_bits(bits: u8) -> Self {
        match bits & S_TYPE_MASK {
            0 => SuperKind::Resync,
            1 => SuperKind::Ifs,
            2 => SuperKind::Abort,
            _ => SuperKind::Wtx,
        }
    }

    fn bits(self) -> u8 {
        match self {
            SuperKind::Resync => 0,
            SuperKind::Ifs => 1,
            SuperKind::Abort => 2,
            SuperKind::Wtx => 3,
        }
    }

    /// Whether blocks of this kind carry exactly one INF byte.
    pub fn carries_value(self) -> bool {
        matches!(self, SuperKind::Ifs | SuperKind::Wtx)
    }

    /// Short name used in traces.
    pub fn name(self) -> &'static str {
        match self {
            SuperKind::Resync => "RESYNC",
            SuperKind::Ifs => "IFS",
            SuperKind::Abort => "ABORT",
            SuperKind::Wtx => "WTX",
        }
    }
}

/// Decoded protocol control byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pcb {
    /// Information block
    Info {
        /// Sequence bit
        seq: bool,
        /// More data follows in the next block
        more: bool,
    },
    /// Receive-ready block
    Ready {
        /// Sequence bit of the block expected next
        seq: bool,
        /// Other error in the block received
        other: bool,
        /// Parity (LRC) error in the block received
        parity: bool,
    },
    /// Supervisory block
    Super {
        /// Which S-block
        kind: SuperKind,
        /// Response rather than request
        response: bool,
    },
}

impl Pcb {
    /// I-block with sequence bit `seq` and more-data bit `more`.
    pub const fn info(seq: bool, more: bool) -> Self {
        Pcb::Info { seq, more }
    }

    /// Error-free acknowledgement expecting `seq` next.
    pub const fn ack(seq: bool) -> Self {
        Pcb::Ready {
            seq,
            other: false,
            parity: false,
        }
    }

    /// S-block request of `kind`.
    pub const fn request(kind: SuperKind) -> Self {
        Pcb::Super {
            kind,
            response: false,
        }
    }

    /// S-block response of `kind`.
    pub const fn response(kind: SuperKind) -> Self {
        Pcb::Super {
            kind,
            response: true,
        }
    }

    /// Classify any byte. The top two bits alone decide the kind.
    pub fn from_byte(byte: u8) -> Self {
        match byte & KIND_MASK {
            KIND_S => Pcb::Super {
                kind: SuperKind::from_bits(byte),
                response: byte & S_RESPONSE_BIT != 0,
            },
            KIND_R => Pcb::Ready {
                seq: byte & R_SEQ_BIT != 0,
                other: byte & R_OTHER_BIT != 0,
                parity: byte & R_PARITY_BIT != 0,
            },
            _ => Pcb::Info {
                seq: byte & I_SEQ_BIT != 0,
                more: byte & I_MORE_BIT != 0,
            },
        }
    }

    /// Encode into the wire byte.
    pub fn to_byte(self) -> u8 {
        match self {
            Pcb::Info { seq, more } => bit(seq, I_SEQ_BIT) | bit(more, I_MORE_BIT),
            Pcb::Ready { seq, other, parity } => {
                KIND_R | bit(seq, R_SEQ_BIT) | bit(other, R_OTHER_BIT) | bit(parity, R_PARITY_BIT)
            }
            Pcb::Super { kind, response } => KIND_S | bit(response, S_RESPONSE_BIT) | kind.bits(),
        }
    }

    /// R-block without error flags.
    pub fn is_clean_ack(self) -> bool {
        matches!(
            self,
            Pcb::Ready {
                other: false,
                parity: false,
                ..
            }
        )
    }

    /// True for I-blocks.
    pub fn is_info(self) -> bool {
        matches!(self, Pcb::Info { .. })
    }
}

impl From<u8> for Pcb {
    fn from(byte: u8) -> Self {
        Pcb::from_byte(byte)
    }
}

impl From<Pcb> for u8 {
    fn from(pcb: Pcb) -> Self {
        pcb.to_byte()
    }
}

impl fmt::Display for Pcb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Pcb::Info { seq, more } => write!(f, "I({}, {})", seq as u8, more as u8),
            Pcb::Ready { seq, other, parity } => {
                write!(f, "R({}, {}, {})", seq as u8, other as u8, parity as u8)
            }
            Pcb::Super { kind, response } => write!(
                f,
                "S({}, {})",
                kind.name(),
                if response { "RESPONSE" } else { "REQUEST" }
            ),
        }
    }
}

/// Classification of a received block for the rule engine: either a
/// decoded PCB or the "no valid block" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Received {
    /// A block that passed the error check
    Block(Pcb),
    /// Anything that did not
    Invalid,
}

impl Received {
    /// Classify a raw PCB byte, mapping the sentinel to `Invalid`.
    pub fn from_byte(byte: u8) -> Self {
        if byte == PCB_INVALID {
            Received::Invalid
        } else {
            Received::Block(Pcb::from_byte(byte))
        }
    }
}

impl fmt::Display for Received {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Received::Block(pcb) => pcb.fmt(f),
            Received::Invalid => f.write_str("INTERNAL-ERROR"),
        }
    }
}

/// Name of a raw PCB byte for tracing. Non-canonical bytes are "???".
pub fn pcb_name(byte: u8) -> String {
    if byte == PCB_INVALID {
        return "INTERNAL-ERROR".to_string();
    }
    let pcb = Pcb::from_byte(byte);
    if pcb.to_byte() == byte {
        pcb.to_string()
    } else {
        "???".to_string()
    }
}

fn bit(flag: bool, mask: u8) -> u8 {
    if flag { mask } else { 0 }
}

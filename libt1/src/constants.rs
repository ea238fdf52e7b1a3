// libt1/src/constants.rs
//! Common protocol constants used across the crate

/// Header length: NAD, PCB, LEN
pub const HEADER_LEN: usize = 3;

/// Maximum information field length carried by one block
pub const INF_LEN: usize = 254;

/// Default information field size of the card (IFSC) before negotiation
pub const DEFAULT_IFS: u8 = 254;

/// Trailing checksum length (single LRC byte)
pub const LRC_LEN: usize = 1;

/// Largest frame on the wire: header + INF + LRC
pub const FRAME_MAX_LEN: usize = HEADER_LEN + INF_LEN + LRC_LEN;

/// LEN value reserved to mean "no valid block"
pub const LEN_INVALID: u8 = 255;

/// PCB value used internally to mark a received block as invalid
pub const PCB_INVALID: u8 = 0xFF;

/// Retransmissions allowed for one block before escalating
pub const MAX_RETRANSMITS: u32 = 3;

/// Cumulative errors after which a RESYNC is forced
pub const RESYNC_ERROR_THRESHOLD: u32 = 3;

/// Cumulative errors after which the device is reset
pub const RESET_ERROR_THRESHOLD: u32 = 6;

/// Terminal error codes shared by every backend
pub const ERROR_HARD_FAIL: i32 = 0;
/// The card aborted the exchange
pub const ERROR_ABORT: i32 = 1;
/// A required device reset was not possible
pub const ERROR_DEVICE_RESET: i32 = 2;

/// Crate-wide (negative) error codes
pub const ERROR_NO_TRANSCEIVE: i32 = -1;
/// Polling ran out of time
pub const ERROR_POLL_TIMEOUT: i32 = -2;

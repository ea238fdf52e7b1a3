// libt1/src/error.rs

use thiserror::Error;

use crate::constants::{
    ERROR_ABORT, ERROR_DEVICE_RESET, ERROR_HARD_FAIL, ERROR_NO_TRANSCEIVE, ERROR_POLL_TIMEOUT,
};

/// Common error type
#[derive(Error, Debug)]
pub enum Error {
    /// The exchange ran out of recovery options.
    #[error("T=1 hard failure: {0}")]
    HardFail(String),

    /// The card aborted the exchange.
    #[error("T=1 abort")]
    Abort,

    /// A device reset was required but could not be performed.
    #[error("T=1 device reset failed")]
    DeviceReset,

    /// Polling for a frame ran out of time.
    #[error("timed out polling for value")]
    Timeout,

    /// A length was outside what the context allows.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Length the context required
        expected: usize,
        /// Length actually seen
        actual: usize,
    },

    /// Received LRC did not match the computed one.
    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch {
        /// LRC computed over the frame
        expected: u8,
        /// LRC carried by the frame
        actual: u8,
    },

    /// A frame could not be interpreted.
    #[error("frame format error: {0}")]
    FrameFormat(String),

    /// Backend-scoped failure. `code` is only meaningful together with
    /// `backend`.
    #[error("{backend}: {message} (code {code})")]
    Hardware {
        /// Name of the failing backend
        backend: &'static str,
        /// Backend-scoped code
        code: i32,
        /// Backend description
        message: String,
    },

    /// Options rejected at open or build time.
    #[error("configuration error: {0}")]
    Config(String),

    /// The backend lacks the requested capability.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl Error {
    /// Numeric code of the error. Terminal protocol failures use the codes
    /// every backend reserves (0..=2), crate-wide conditions are negative
    /// and backend failures carry their own code.
    pub fn code(&self) -> i32 {
        match self {
            Error::HardFail(_) => ERROR_HARD_FAIL,
            Error::Abort => ERROR_ABORT,
            Error::DeviceReset => ERROR_DEVICE_RESET,
            Error::Timeout => ERROR_POLL_TIMEOUT,
            Error::Hardware { code, .. } => *code,
            Error::UnsupportedOperation(_) => ERROR_NO_TRANSCEIVE,
            Error::InvalidLength { .. }
            | Error::ChecksumMismatch { .. }
            | Error::FrameFormat(_)
            | Error::Config(_) => ERROR_HARD_FAIL,
        }
    }

    /// Snapshot of the error as a code/message pair.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// Code/message pair retained by an interface after a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Numeric code, see [`Error::code`]
    pub code: i32,
    /// Display text of the error
    pub message: String,
}

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

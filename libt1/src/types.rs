// libt1/src/types.rs

use std::convert::TryFrom;

use derive_more::Display;

use crate::Error;
use crate::constants::{DEFAULT_IFS, INF_LEN};

/// Information field size - Newtype Pattern (1..=254)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Ifs(u8);

impl Ifs {
    /// 254, the largest INF
    pub const DEFAULT: Self = Self(DEFAULT_IFS);

    /// Raw value.
    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Value as a buffer length.
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl Default for Ifs {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Ifs {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value == 0 || value as usize > INF_LEN {
            return Err(Error::InvalidLength {
                expected: INF_LEN,
                actual: value as usize,
            });
        }
        Ok(Self(value))
    }
}

impl From<Ifs> for u8 {
    fn from(ifs: Ifs) -> Self {
        ifs.0
    }
}

/// Wait-time extension multiplier applied to the next receive timeout.
/// A zero request is treated as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaitMultiplier(u8);

impl WaitMultiplier {
    /// No extension
    pub const ONE: Self = Self(1);

    /// Multiplier requested by the card.
    pub fn new(value: u8) -> Self {
        Self(value.max(1))
    }

    /// Effective multiplier, at least 1.
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for WaitMultiplier {
    fn default() -> Self {
        Self::ONE
    }
}

/// Direction a frame is travelling, as seen by the preprocessing hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Direction {
    /// Outbound, after sealing
    #[display(fmt = "transmit")]
    Transmit,
    /// Inbound, before the error check
    #[display(fmt = "receive")]
    Receive,
}

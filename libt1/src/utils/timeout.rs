//! Timeout helpers used across the crate.

use std::time::Duration;

use crate::types::WaitMultiplier;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Block waiting time stretched by a pending wait-time extension.
pub fn extended_wait(bwt: Duration, multiplier: WaitMultiplier) -> Duration {
    bwt.saturating_mul(multiplier.get() as u32)
}

/// Number of character-time intervals a polling backend should sample
/// within `timeout`, rounded to nearest.
pub fn poll_intervals(timeout: Duration, character_time: Duration) -> u32 {
    if character_time.is_zero() {
        return 0;
    }
    let ratio = timeout.as_secs_f64() / character_time.as_secs_f64();
    (ratio + 0.5) as u32
}

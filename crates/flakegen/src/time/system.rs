use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// The process wall clock, read through [`SystemTime::now`].
///
/// The wall clock can be stepped backwards by NTP or an operator. The
/// generator absorbs small steps and rejects large ones; see
/// [`SnowflakeGenerator::generate`].
///
/// [`SnowflakeGenerator::generate`]: crate::SnowflakeGenerator::generate
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        // A clock set before 1970 reads as 0, which the generator reports as
        // out of range instead of panicking here.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

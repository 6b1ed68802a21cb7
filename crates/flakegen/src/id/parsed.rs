use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::SnowflakeId;

/// The decoded fields of a [`SnowflakeId`].
///
/// `timestamp` is absolute: milliseconds since the Unix epoch, with the
/// custom epoch already added back.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParsedId {
    /// Milliseconds since 1970-01-01 UTC.
    pub timestamp: u64,
    pub machine_id: u16,
    pub sequence: u16,
}

impl ParsedId {
    /// The embedded timestamp as a [`SystemTime`].
    pub fn system_time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.timestamp)
    }
}

impl From<SnowflakeId> for ParsedId {
    fn from(id: SnowflakeId) -> Self {
        id.parse()
    }
}

/// Decodes `id` into its timestamp, machine ID and sequence.
pub const fn parse_id(id: SnowflakeId) -> ParsedId {
    id.parse()
}

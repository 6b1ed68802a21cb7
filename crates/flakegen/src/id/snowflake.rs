use core::fmt;

use crate::{ParsedId, time::CUSTOM_EPOCH_MILLIS};

/// A 64-bit Snowflake ID.
///
/// - 1 bit reserved
/// - 41 bits timestamp (ms since [`CUSTOM_EPOCH`])
/// - 10 bits machine ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21             12 11             0
///              +--------------+----------------+-----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | machine ID (10) | sequence (12) |
///              +--------------+----------------+-----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
/// ```
///
/// Ordering follows the raw integer, so IDs compare by timestamp first, then
/// machine ID, then sequence.
///
/// # Example
///
/// ```
/// use flakegen::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 42, 7);
/// assert_eq!(id.decompose(), (1000, 42, 7));
/// assert_eq!(id.to_string(), "4194476039");
/// ```
///
/// [`CUSTOM_EPOCH`]: crate::CUSTOM_EPOCH
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for extracting the 10-bit machine ID field. Occupies bits 12
    /// through 21.
    pub const MACHINE_ID_MASK: u64 = (1 << 10) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the machine ID to its correct position (bit 12).
    pub const MACHINE_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// The reserved most significant bit. Always clear on generated IDs.
    pub const RESERVED_MASK: u64 = 1 << 63;

    /// Packs a timestamp offset, machine ID and sequence into an ID.
    ///
    /// Each field is masked to its bit width before shifting, so oversized
    /// inputs are truncated rather than bleeding into neighbouring fields.
    pub const fn from_components(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let machine_id = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | machine_id | sequence,
        }
    }

    /// Splits the ID into `(timestamp, machine_id, sequence)`.
    pub const fn decompose(&self) -> (u64, u64, u64) {
        (self.timestamp(), self.machine_id(), self.sequence())
    }

    /// Extracts the timestamp offset (ms since the custom epoch).
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the machine ID.
    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    /// Extracts the sequence number.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    pub const fn max_machine_id() -> u64 {
        Self::MACHINE_ID_MASK
    }

    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns the raw integer.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Wraps a raw integer without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns `true` if the reserved bit is clear, i.e. the value could have
    /// been produced by a generator.
    pub const fn is_valid(&self) -> bool {
        self.id & Self::RESERVED_MASK == 0
    }

    /// Absolute timestamp in milliseconds since the Unix epoch.
    pub const fn unix_millis(&self) -> u64 {
        self.timestamp() + CUSTOM_EPOCH_MILLIS
    }

    /// Decodes the ID into its [`ParsedId`] view.
    pub const fn parse(&self) -> ParsedId {
        ParsedId {
            timestamp: self.unix_millis(),
            machine_id: self.machine_id() as u16,
            sequence: self.sequence() as u16,
        }
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl From<u64> for SnowflakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("machine_id", &self.machine_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

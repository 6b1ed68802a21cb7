use core::time::Duration;

/// A result type defaulting to the generator [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `flakegen` can emit while building or running a
/// generator.
///
/// Generation is all-or-nothing: when an error is returned no ID was produced
/// and the generator state is exactly as it was before the call. Nothing is
/// retried internally.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The machine ID does not fit the 10-bit field.
    #[error("machine id must be between 0 and {max}, got {machine_id}")]
    InvalidMachineId { machine_id: u64, max: u64 },

    /// A configuration value could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    /// The clock moved backwards by more than the configured tolerance.
    ///
    /// The generator stays usable; a later call succeeds once the clock is
    /// back within tolerance.
    #[error(
        "clock moved backwards by {drift}ms, beyond tolerance of {tolerance}ms; \
         refusing to generate id to prevent duplicates"
    )]
    ClockMovedBackwards { drift: u64, tolerance: u64 },

    /// A bounded wait for the clock to reach a usable millisecond expired.
    #[error("timed out after {waited:?} waiting for the clock to pass {last_timestamp}")]
    WaitTimeout {
        /// The high-water mark (ms since the Unix epoch) the clock had to
        /// reach.
        last_timestamp: u64,
        waited: Duration,
    },

    /// The clock reads before the custom epoch or past the last millisecond
    /// the 41-bit timestamp field can hold.
    #[error("timestamp {millis}ms is outside the encodable range")]
    TimestampOutOfRange { millis: u64 },
}

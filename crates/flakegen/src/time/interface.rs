use std::{sync::Arc, time::Duration};

/// Custom epoch in milliseconds since the Unix epoch.
pub const CUSTOM_EPOCH_MILLIS: u64 = 1_767_225_600_000;

/// Custom epoch: Thursday, January 1, 2026 00:00:00 UTC
///
/// Every generated ID embeds its timestamp relative to this instant. Changing
/// it shifts the decoded timestamps of previously issued IDs but not their
/// relative order.
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(CUSTOM_EPOCH_MILLIS);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock or a
/// controlled source in tests. The unit is **milliseconds since the Unix
/// epoch**; the generator subtracts [`CUSTOM_EPOCH`] itself.
///
/// Implementations are not expected to be monotonic. Backward jumps are
/// detected and handled by the generator.
///
/// # Example
///
/// ```
/// use flakegen::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

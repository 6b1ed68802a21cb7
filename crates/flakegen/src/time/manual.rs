use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::{CUSTOM_EPOCH_MILLIS, TimeSource};

/// A clock that only moves when told to.
///
/// Clones share the same underlying value, so one handle can be given to a
/// generator while another is moved to a different thread to advance or
/// rewind time while the generator is waiting.
///
/// # Example
///
/// ```
/// use flakegen::{CUSTOM_EPOCH_MILLIS, ManualClock, TimeSource};
///
/// let clock = ManualClock::at_epoch_offset(1000);
/// let handle = clock.clone();
/// handle.advance(5);
/// assert_eq!(clock.current_millis(), CUSTOM_EPOCH_MILLIS + 1005);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock frozen at `millis` since the Unix epoch.
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(millis)),
        }
    }

    /// Creates a clock frozen at `offset` milliseconds past the custom epoch.
    pub fn at_epoch_offset(offset: u64) -> Self {
        Self::new(CUSTOM_EPOCH_MILLIS + offset)
    }

    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::Release);
    }

    /// Moves the clock forward by `millis`.
    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::AcqRel);
    }

    /// Moves the clock backward by `millis`, saturating at zero.
    pub fn rewind(&self, millis: u64) {
        let mut current = self.millis.load(Ordering::Acquire);
        loop {
            let next = current.saturating_sub(millis);
            match self.millis.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}

impl TimeSource for ManualClock {
    fn current_millis(&self) -> u64 {
        self.millis.load(Ordering::Acquire)
    }
}

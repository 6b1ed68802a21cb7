use core::{fmt, time::Duration};
use std::{thread, time::Instant};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::{
    CUSTOM_EPOCH_MILLIS, Error, GeneratorConfig, Result, SnowflakeId, SystemClock, TimeSource,
};

/// Mutable part of the generator. Only touched while the mutex is held.
#[derive(Clone, Copy, Debug, Default)]
struct State {
    /// Last millisecond (since the Unix epoch) an ID was issued for. `None`
    /// until the first ID.
    last_timestamp: Option<u64>,
    sequence: u64,
}

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The timestamp/sequence state sits behind a [`parking_lot::Mutex`], so a
/// `generate` call fully completes, with an ID or an error, before the next
/// one on the same instance begins. Share it across threads with an
/// [`Arc`](std::sync::Arc) or a reference.
///
/// Within one instance every returned ID is strictly greater than every ID
/// returned before it. Up to 4096 IDs are issued per millisecond; after that
/// the caller spins until the clock ticks.
///
/// # Example
///
/// ```
/// use flakegen::{ManualClock, SnowflakeGenerator, CUSTOM_EPOCH_MILLIS};
///
/// let clock = ManualClock::at_epoch_offset(1000);
/// let generator = SnowflakeGenerator::with_time(42, clock).unwrap();
///
/// let first = generator.generate().unwrap().parse();
/// let second = generator.generate().unwrap().parse();
///
/// assert_eq!(first.timestamp, CUSTOM_EPOCH_MILLIS + 1000);
/// assert_eq!((first.machine_id, first.sequence), (42, 0));
/// assert_eq!((second.machine_id, second.sequence), (42, 1));
/// ```
pub struct SnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    machine_id: u16,
    clock_skew_tolerance: u64,
    wait_timeout: Duration,
    state: Mutex<State>,
    time: T,
}

impl SnowflakeGenerator<SystemClock> {
    /// Creates a generator on the system clock with the default 5 ms clock
    /// skew tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMachineId`] if `machine_id > 1023`.
    pub fn new(machine_id: u16) -> Result<Self> {
        Self::with_time(machine_id, SystemClock)
    }

    /// Creates a generator on the system clock with a custom clock skew
    /// tolerance in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMachineId`] if `machine_id > 1023`.
    pub fn with_tolerance(machine_id: u16, clock_skew_tolerance: u64) -> Result<Self> {
        let config = GeneratorConfig::new(machine_id).with_clock_skew_tolerance(clock_skew_tolerance);
        Self::from_config(&config, SystemClock)
    }
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator reading time from `time`, with default tolerance
    /// and wait timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMachineId`] if `machine_id > 1023`.
    pub fn with_time(machine_id: u16, time: T) -> Result<Self> {
        Self::from_config(&GeneratorConfig::new(machine_id), time)
    }

    /// Creates a generator from a full [`GeneratorConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMachineId`] if the configured machine ID is
    /// above 1023. Nothing is created in that case.
    pub fn from_config(config: &GeneratorConfig, time: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            machine_id: config.machine_id,
            clock_skew_tolerance: config.clock_skew_tolerance,
            wait_timeout: config.wait_timeout,
            state: Mutex::new(State::default()),
            time,
        })
    }

    pub fn machine_id(&self) -> u16 {
        self.machine_id
    }

    pub fn clock_skew_tolerance(&self) -> u64 {
        self.clock_skew_tolerance
    }

    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    pub fn time(&self) -> &T {
        &self.time
    }

    /// Generates the next ID.
    ///
    /// - Same millisecond as the last ID: the sequence is incremented. If all
    ///   4096 sequence values are used, spins until the clock passes the last
    ///   timestamp and starts again at sequence 0.
    /// - Newer millisecond: the sequence resets to 0.
    /// - Older millisecond by at most the clock skew tolerance: spins until
    ///   the clock is no longer behind, then continues as above.
    /// - Older by more than the tolerance: fails at once without waiting.
    ///
    /// Every wait is bounded by the configured wait timeout (1000 ms by
    /// default), measured on a monotonic clock.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackwards`] if the backward drift exceeds the
    ///   tolerance.
    /// - [`Error::WaitTimeout`] if a wait exceeds the timeout.
    /// - [`Error::TimestampOutOfRange`] if the clock reads before the custom
    ///   epoch or past the 41-bit timestamp horizon.
    ///
    /// On error, the generator state is left exactly as it was.
    pub fn generate(&self) -> Result<SnowflakeId> {
        let mut state = self.state.lock();
        let mut now = self.time.current_millis();
        let mut sequence = 0;

        if let Some(last) = state.last_timestamp {
            if now < last {
                now = self.cold_clock_behind(now, last)?;
            }

            if now == last {
                sequence = (state.sequence + 1) & SnowflakeId::SEQUENCE_MASK;
                if sequence == 0 {
                    now = self.cold_sequence_exhausted(last)?;
                }
            }
        }

        let offset = Self::epoch_offset(now)?;

        state.last_timestamp = Some(now);
        state.sequence = sequence;

        let id = SnowflakeId::from_components(offset, u64::from(self.machine_id), sequence);
        trace!(%id, timestamp = now, sequence, "generated id");
        Ok(id)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, now: u64, last: u64) -> Result<u64> {
        let drift = last - now;
        if drift > self.clock_skew_tolerance {
            warn!(
                drift,
                tolerance = self.clock_skew_tolerance,
                machine_id = self.machine_id,
                "clock moved backwards beyond tolerance"
            );
            return Err(Error::ClockMovedBackwards {
                drift,
                tolerance: self.clock_skew_tolerance,
            });
        }

        debug!(drift, last_timestamp = last, "waiting for clock to catch up");
        self.spin_until(last, |t| t >= last)
    }

    #[cold]
    #[inline(never)]
    fn cold_sequence_exhausted(&self, last: u64) -> Result<u64> {
        debug!(last_timestamp = last, "sequence exhausted, waiting for next millisecond");
        self.spin_until(last, |t| t > last)
    }

    /// Polls the clock until `ready` accepts a reading or the wait timeout
    /// elapses.
    fn spin_until(&self, last_timestamp: u64, ready: impl Fn(u64) -> bool) -> Result<u64> {
        let start = Instant::now();
        loop {
            let now = self.time.current_millis();
            if ready(now) {
                return Ok(now);
            }

            let waited = start.elapsed();
            if waited > self.wait_timeout {
                warn!(
                    last_timestamp,
                    now,
                    ?waited,
                    machine_id = self.machine_id,
                    "timed out waiting for clock"
                );
                return Err(Error::WaitTimeout {
                    last_timestamp,
                    waited,
                });
            }

            core::hint::spin_loop();
            thread::yield_now();
        }
    }

    fn epoch_offset(millis: u64) -> Result<u64> {
        millis
            .checked_sub(CUSTOM_EPOCH_MILLIS)
            .filter(|offset| *offset <= SnowflakeId::max_timestamp())
            .ok_or(Error::TimestampOutOfRange { millis })
    }
}

impl<T> fmt::Debug for SnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeGenerator")
            .field("machine_id", &self.machine_id)
            .field("clock_skew_tolerance", &self.clock_skew_tolerance)
            .field("wait_timeout", &self.wait_timeout)
            .field("state", &self.state.try_lock().map(|state| *state))
            .finish_non_exhaustive()
    }
}

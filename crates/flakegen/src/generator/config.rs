use core::time::Duration;

use crate::{Error, Result, SnowflakeId};

/// Backward clock drift, in milliseconds, absorbed by waiting by default.
pub const DEFAULT_CLOCK_SKEW_TOLERANCE_MS: u64 = 5;

/// Upper bound on any single spin-wait inside the generator.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Environment variable holding the machine ID.
pub const MACHINE_ID_ENV: &str = "MACHINE_ID";

/// Environment variable holding the clock skew tolerance in milliseconds.
pub const CLOCK_SKEW_TOLERANCE_ENV: &str = "CLOCK_SKEW_TOLERANCE_MS";

/// Environment variable holding the wait timeout in milliseconds.
pub const WAIT_TIMEOUT_ENV: &str = "WAIT_TIMEOUT_MS";

/// Settings for a [`SnowflakeGenerator`].
///
/// The machine ID must be unique among all generators sharing an ID space.
/// It is provisioned externally; nothing here coordinates it.
///
/// [`SnowflakeGenerator`]: crate::SnowflakeGenerator
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Machine ID in `0..=1023`.
    pub machine_id: u16,
    /// Maximum backward clock drift (ms) absorbed by waiting.
    pub clock_skew_tolerance: u64,
    /// Bound on each spin-wait.
    pub wait_timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            machine_id: 0,
            clock_skew_tolerance: DEFAULT_CLOCK_SKEW_TOLERANCE_MS,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

impl GeneratorConfig {
    pub fn new(machine_id: u16) -> Self {
        Self {
            machine_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_clock_skew_tolerance(mut self, millis: u64) -> Self {
        self.clock_skew_tolerance = millis;
        self
    }

    #[must_use]
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Checks that the machine ID fits the 10-bit field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMachineId`] if `machine_id > 1023`.
    pub fn validate(&self) -> Result<()> {
        let machine_id = u64::from(self.machine_id);
        if machine_id > SnowflakeId::max_machine_id() {
            return Err(Error::InvalidMachineId {
                machine_id,
                max: SnowflakeId::max_machine_id(),
            });
        }
        Ok(())
    }

    /// Reads the configuration from the process environment.
    ///
    /// Unset variables fall back to their defaults: machine ID 0, a 5 ms
    /// tolerance and a 1000 ms wait timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for values that are not non-negative
    /// integers of the right width and [`Error::InvalidMachineId`] for machine
    /// IDs above 1023.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Self::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(MACHINE_ID_ENV) {
            config.machine_id = parse_var(MACHINE_ID_ENV, value)?;
        }
        if let Some(value) = lookup(CLOCK_SKEW_TOLERANCE_ENV) {
            config.clock_skew_tolerance = parse_var(CLOCK_SKEW_TOLERANCE_ENV, value)?;
        }
        if let Some(value) = lookup(WAIT_TIMEOUT_ENV) {
            config.wait_timeout = Duration::from_millis(parse_var(WAIT_TIMEOUT_ENV, value)?);
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<N: core::str::FromStr>(key: &'static str, value: String) -> Result<N> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig { key, value })
}

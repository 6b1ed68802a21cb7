//! Process-wide default generator.
//!
//! This is a start-up convenience for applications that want a single
//! generator without threading a handle through their code. The slot owns
//! one [`SnowflakeGenerator`] on the system clock; applications that need a
//! different clock, or several machine IDs, should own their generators
//! directly.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::{GeneratorConfig, Result, SnowflakeGenerator, SnowflakeId, SystemClock};

static DEFAULT_GENERATOR: RwLock<Option<Arc<SnowflakeGenerator<SystemClock>>>> =
    parking_lot::const_rwlock(None);

/// Builds a generator from `config` and installs it as the default,
/// replacing any previous one.
///
/// Intended for start-up and tests. Callers that already hold a handle from
/// [`default_generator`] keep using the old instance.
///
/// # Errors
///
/// Returns [`Error::InvalidMachineId`](crate::Error::InvalidMachineId) if the
/// configuration is invalid; the previous default stays installed.
pub fn init_generator(config: GeneratorConfig) -> Result<()> {
    let generator = Arc::new(SnowflakeGenerator::from_config(&config, SystemClock)?);
    *DEFAULT_GENERATOR.write() = Some(generator);
    info!(
        machine_id = config.machine_id,
        clock_skew_tolerance = config.clock_skew_tolerance,
        "default id generator initialized"
    );
    Ok(())
}

/// Returns a handle to the default generator, creating it from
/// [`GeneratorConfig::from_env`] on first use.
///
/// # Errors
///
/// Returns the configuration error if the default has to be created and the
/// environment is invalid.
pub fn default_generator() -> Result<Arc<SnowflakeGenerator<SystemClock>>> {
    let existing = DEFAULT_GENERATOR.read().clone();
    if let Some(generator) = existing {
        return Ok(generator);
    }

    let mut slot = DEFAULT_GENERATOR.write();
    if let Some(generator) = slot.as_ref() {
        return Ok(Arc::clone(generator));
    }

    let config = GeneratorConfig::from_env()?;
    let generator = Arc::new(SnowflakeGenerator::from_config(&config, SystemClock)?);
    *slot = Some(Arc::clone(&generator));
    info!(
        machine_id = config.machine_id,
        "default id generator initialized from environment"
    );
    Ok(generator)
}

/// Generates an ID from the default generator.
///
/// # Errors
///
/// See [`default_generator`] and [`SnowflakeGenerator::generate`].
pub fn generate_id() -> Result<SnowflakeId> {
    default_generator()?.generate()
}

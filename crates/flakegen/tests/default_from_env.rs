//! Runs in its own test binary so the process-wide default slot starts empty.

use std::sync::Arc;

use flakegen::{
    CLOCK_SKEW_TOLERANCE_ENV, DEFAULT_CLOCK_SKEW_TOLERANCE_MS, DEFAULT_WAIT_TIMEOUT,
    MACHINE_ID_ENV, WAIT_TIMEOUT_ENV, default_generator, generate_id,
};

#[test]
fn default_generator_is_created_from_environment() {
    // SAFETY: this binary has a single test, so no other thread reads the
    // environment concurrently.
    unsafe {
        std::env::set_var(MACHINE_ID_ENV, "77");
        std::env::remove_var(CLOCK_SKEW_TOLERANCE_ENV);
        std::env::remove_var(WAIT_TIMEOUT_ENV);
    }

    let first = generate_id().unwrap();
    assert!(first.is_valid());
    assert_eq!(first.machine_id(), 77);

    let generator = default_generator().unwrap();
    assert_eq!(generator.machine_id(), 77);
    assert_eq!(
        generator.clock_skew_tolerance(),
        DEFAULT_CLOCK_SKEW_TOLERANCE_MS
    );
    assert_eq!(generator.wait_timeout(), DEFAULT_WAIT_TIMEOUT);
    assert!(Arc::ptr_eq(&generator, &default_generator().unwrap()));

    // Later changes to the environment do not rebuild the default.
    // SAFETY: see above.
    unsafe {
        std::env::set_var(MACHINE_ID_ENV, "5");
    }
    let second = generate_id().unwrap();
    assert_eq!(second.machine_id(), 77);
    assert!(second > first);
}

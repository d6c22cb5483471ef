//! The runtime-delta policy, observed end to end.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::prelude::*;

/// The first passing run seeds the average and is recorded with no
/// delta verdict, since there was no baseline to judge against.
#[test]
fn first_run_seeds_the_average() {
    let dir = history_dir();
    let mut listener = dir.listener("60");

    let result = run_test(&mut listener, passing("login", 100));
    assert!(result.passed);
    assert!(result.message.is_empty());

    let record = listener.history().record("login", "qa").unwrap();
    assert_eq!(record.average_runtime, 100);
    assert_eq!(record.runtime_log.len(), 1);
    assert_eq!(record.runtime_log[0].delta_exceeded, None);
}

/// A passing run past the tolerance is rewritten as a failure with a
/// descriptive message, and its runtime is kept out of the average.
#[test]
fn run_past_tolerance_is_rewritten_as_failure() {
    let dir = history_dir();
    let mut listener = dir.listener("60");

    run_test(&mut listener, passing("login", 100));
    let result = run_test(&mut listener, passing("login", 200));

    assert!(!result.passed);
    assert!(!result.message.is_empty());

    let record = listener.history().record("login", "qa").unwrap();
    // The log keeps the host's own verdict; the override is visible in
    // the delta flag.
    assert!(record.runtime_log[0].passed);
    assert_eq!(record.runtime_log[0].delta_exceeded, Some(true));
    assert_eq!(record.average_runtime, 100);
}

/// A run back inside tolerance is accepted and folded in with floor
/// division.
#[test]
fn accepted_run_folds_the_average() {
    let dir = history_dir();
    let mut listener = dir.listener("60");

    run_test(&mut listener, passing("login", 100));
    run_test(&mut listener, passing("login", 200));
    let result = run_test(&mut listener, passing("login", 130));

    assert!(result.passed);
    let record = listener.history().record("login", "qa").unwrap();
    assert_eq!(record.average_runtime, 115);
    assert_eq!(record.runtime_log[0].delta_exceeded, Some(false));
}

/// A run exactly at average plus tolerance is still acceptable.
#[test]
fn tolerance_boundary_is_inclusive() {
    let dir = history_dir();
    let mut listener = dir.listener("60");

    run_test(&mut listener, passing("login", 100));
    let result = run_test(&mut listener, passing("login", 160));

    assert!(result.passed);
    let record = listener.history().record("login", "qa").unwrap();
    assert_eq!(record.runtime_log[0].delta_exceeded, Some(false));
    assert_eq!(record.average_runtime, 130);
}

/// Failing runs are recorded but never touch the average, no matter how
/// fast or slow they were.
#[test]
fn failing_runs_never_update_the_average() {
    let dir = history_dir();
    let mut listener = dir.listener("60");

    run_test(&mut listener, passing("login", 100));
    let result = run_test(&mut listener, failing("login", 5));

    // The listener leaves failing results alone.
    assert!(!result.passed);
    assert!(result.message.is_empty());

    let record = listener.history().record("login", "qa").unwrap();
    assert_eq!(record.average_runtime, 100);
    assert_eq!(record.runtime_log.len(), 2);
    assert!(!record.runtime_log[0].passed);
}

/// A slow failing run is not flagged as a delta violation; the policy
/// only judges passing runs.
#[test]
fn slow_failing_run_is_not_flagged() {
    let dir = history_dir();
    let mut listener = dir.listener("60");

    run_test(&mut listener, passing("login", 100));
    let result = run_test(&mut listener, failing("login", 900));

    assert!(result.message.is_empty());
    let record = listener.history().record("login", "qa").unwrap();
    assert_eq!(record.runtime_log[0].delta_exceeded, Some(false));
}

/// Before any baseline exists, failing runs carry a null delta flag.
#[test]
fn failing_run_before_baseline_has_null_flag() {
    let dir = history_dir();
    let mut listener = dir.listener("60");

    let result = run_test(&mut listener, failing("login", 50));
    assert!(!result.passed);

    let record = listener.history().record("login", "qa").unwrap();
    assert_eq!(record.average_runtime, 0);
    assert_eq!(record.runtime_log[0].delta_exceeded, None);
}

/// The log is newest-first and its length matches the number of runs;
/// ids count up from zero in insertion order.
#[test]
fn runtime_log_is_newest_first() {
    let dir = history_dir();
    let mut listener = dir.listener("1h");

    for secs in [10, 20, 30, 40] {
        run_test(&mut listener, passing("login", secs));
    }

    let record = listener.history().record("login", "qa").unwrap();
    assert_eq!(record.runtime_log.len(), 4);
    let runtimes: Vec<u64> = record.runtime_log.iter().map(|run| run.runtime).collect();
    assert_eq!(runtimes, vec![40, 30, 20, 10]);
    let ids: Vec<u64> = record.runtime_log.iter().map(|run| run.id).collect();
    assert_eq!(ids, vec![3, 2, 1, 0]);
}

/// Environment labels are case-insensitive: `QA` and `qa` share one
/// bucket.
#[test]
fn environment_labels_share_a_bucket_across_casing() {
    let dir = history_dir();

    let mut upper = Stopwatch::new(StopwatchConfig {
        environment: Some("QA".into()),
        flush: FlushMode::EveryTest,
        ..dir.config()
    })
    .unwrap();
    run_test(&mut upper, passing("login", 100));

    let mut lower = Stopwatch::new(StopwatchConfig {
        environment: Some("qa".into()),
        flush: FlushMode::EveryTest,
        ..dir.config()
    })
    .unwrap();
    run_test(&mut lower, passing("login", 120));

    let record = lower.history().record("login", "qa").unwrap();
    assert_eq!(record.runtime_log.len(), 2);
    assert_eq!(record.average_runtime, 110);
}

/// Distinct environments keep distinct baselines for the same test.
#[test]
fn environments_are_separate_baselines() {
    let dir = history_dir();

    let mut qa = Stopwatch::new(StopwatchConfig {
        environment: Some("qa".into()),
        flush: FlushMode::EveryTest,
        ..dir.config()
    })
    .unwrap();
    run_test(&mut qa, passing("login", 10));

    let mut prod = Stopwatch::new(StopwatchConfig {
        environment: Some("prod".into()),
        flush: FlushMode::EveryTest,
        ..dir.config()
    })
    .unwrap();
    // Far past qa's baseline plus tolerance, but prod has no baseline.
    let result = run_test(&mut prod, passing("login", 500));

    assert!(result.passed);
    assert_eq!(
        prod.history().record("login", "prod").unwrap().average_runtime,
        500
    );
}

/// Runs are stamped with the host-supplied start time at second
/// precision.
#[test]
fn runs_carry_a_formatted_timestamp() {
    let dir = history_dir();
    let mut listener = dir.listener("60");

    run_test(
        &mut listener,
        passing("login", 10).with_start_time(start_time()),
    );

    let record = listener.history().record("login", "qa").unwrap();
    assert_eq!(
        record.runtime_log[0].timestamp.as_deref(),
        Some("14/03/26 09:30:12")
    );
}

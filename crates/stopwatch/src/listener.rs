// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The per-test stopwatch listener.

use std::path::Path;

use crate::config::{self, FlushMode, StopwatchConfig};
use crate::errors::{HistoryError, StopwatchError};
use crate::history::{RunRecord, TestHistory};
use crate::policy::{self, DeltaPolicy, DeltaVerdict};
use crate::record::{RunListener, RunResult};
use crate::store::HistoryStore;

/// Filename used when no logfile is configured.
const DEFAULT_LOGFILE: &str = "stopwatch_log.json";

/// Timestamp format recorded with each run.
const TIMESTAMP_FORMAT: &str = "%d/%m/%y %H:%M:%S";

/// Message attached when a passing run breaks the delta policy.
const DELTA_MESSAGE: &str = "Stopwatch: PASS, but execution exceeded the acceptance time delta.";

/// Tracks per-test runtimes and fails tests that drift past their
/// recorded average by more than the configured tolerance.
///
/// The history document is loaded once at construction and mutated in
/// memory as hooks arrive; flushes happen at the configured cadence.
#[derive(Debug)]
pub struct Stopwatch {
    environment: String,
    policy: DeltaPolicy,
    flush: FlushMode,
    store: HistoryStore,
    history: TestHistory,
    active: Option<ActiveTest>,
}

/// State stashed between `on_test_start` and `on_test_end`. The baseline
/// is captured at start so the end hook judges against the average that
/// was in effect when the test began.
#[derive(Debug)]
struct ActiveTest {
    name: String,
    baseline: u64,
}

impl Stopwatch {
    /// Builds the listener: resolves options, opens the history file
    /// (creating it on first use), and loads the document.
    pub fn new(config: StopwatchConfig) -> Result<Self, StopwatchError> {
        let logfile = config::resolve_logfile(config.logfile, DEFAULT_LOGFILE);
        let environment = config::resolve_environment(config.environment);
        let tolerance = config::parse_timedelta(config.timedelta.as_deref())?;

        let store = HistoryStore::open(logfile)?;
        let history = store.load()?;

        Ok(Self {
            environment,
            policy: DeltaPolicy::new(tolerance),
            flush: config.flush,
            store,
            history,
            active: None,
        })
    }

    /// The document as currently held in memory.
    pub fn history(&self) -> &TestHistory {
        &self.history
    }

    /// Absolute path of the history file.
    pub fn logfile(&self) -> &Path {
        self.store.path()
    }

    /// The resolved, lower-cased environment label.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    fn flush_history(&self) -> Result<(), HistoryError> {
        self.store.save(&self.history)
    }
}

impl RunListener for Stopwatch {
    fn on_test_start(&mut self, test: &mut RunResult) -> Result<(), HistoryError> {
        let record = self.history.record_mut(&test.name, &self.environment);
        self.active = Some(ActiveTest {
            name: test.name.clone(),
            baseline: record.average_runtime,
        });
        Ok(())
    }

    fn on_test_end(&mut self, test: &mut RunResult) -> Result<(), HistoryError> {
        // An end with no matching start can happen when the listener is
        // registered mid-run; there is nothing to record against.
        let Some(active) = self.active.take() else {
            return Ok(());
        };

        let runtime = test.elapsed.as_secs();
        let passed = test.passed;
        let verdict = self.policy.evaluate(active.baseline, passed, runtime);

        if verdict == DeltaVerdict::Exceeded {
            test.passed = false;
            test.message = DELTA_MESSAGE.to_string();
        }

        let timestamp = test
            .start_time
            .map(|start| start.format(TIMESTAMP_FORMAT).to_string());

        let record = self.history.record_mut(&active.name, &self.environment);
        let run = RunRecord {
            id: record.next_run_id(),
            timestamp,
            passed,
            runtime,
            delta_exceeded: verdict.as_flag(),
        };
        record.average_runtime = policy::fold_average(active.baseline, &run);
        record.push_run(run);

        if self.flush == FlushMode::EveryTest {
            self.flush_history()?;
        }
        Ok(())
    }

    fn on_suite_end(&mut self, _suite: &mut RunResult) -> Result<(), HistoryError> {
        if self.flush == FlushMode::SuiteEnd {
            self.flush_history()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;

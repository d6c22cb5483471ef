// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The per-suite stopwatch listener.

use std::ffi::OsStr;
use std::path::Path;

use crate::config::{self, StopwatchConfig};
use crate::errors::{HistoryError, StopwatchError};
use crate::history::{SuiteHistory, SuiteRun};
use crate::policy;
use crate::record::{RunListener, RunResult};
use crate::store::HistoryStore;

/// Filename used when no logfile is configured.
const DEFAULT_LOGFILE: &str = "stopwatch_history.json";

/// Suite runs are stamped at minute precision.
const TIMESTAMP_FORMAT: &str = "%d/%m/%y %H:%M";

/// Records suite elapsed times per environment.
///
/// Recording only: suite results are never overridden, and the
/// `timedelta` option is ignored at this granularity. The document is
/// flushed at every suite end.
#[derive(Debug)]
pub struct SuiteStopwatch {
    environment: String,
    store: HistoryStore,
    history: SuiteHistory,
    /// Suites nest; completions arrive LIFO.
    active: Vec<ActiveSuite>,
}

#[derive(Debug)]
struct ActiveSuite {
    key: String,
    baseline: Option<u64>,
}

impl SuiteStopwatch {
    /// Builds the listener: resolves options, opens the history file
    /// (creating it on first use), and loads the document.
    pub fn new(config: StopwatchConfig) -> Result<Self, StopwatchError> {
        let logfile = config::resolve_logfile(config.logfile, DEFAULT_LOGFILE);
        let environment = config::resolve_environment(config.environment);

        let store = HistoryStore::open(logfile)?;
        let history = store.load()?;

        Ok(Self {
            environment,
            store,
            history,
            active: Vec::new(),
        })
    }

    /// The document as currently held in memory.
    pub fn history(&self) -> &SuiteHistory {
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

    /// History key for a suite: its source file stem, else its display
    /// name.
    fn suite_key(suite: &RunResult) -> String {
        suite
            .source
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(OsStr::to_str)
            .map(str::to_string)
            .unwrap_or_else(|| suite.name.clone())
    }
}

impl RunListener for SuiteStopwatch {
    fn on_suite_start(&mut self, suite: &mut RunResult) -> Result<(), HistoryError> {
        let key = Self::suite_key(suite);
        let record = self.history.record_mut(&key, &self.environment);
        self.active.push(ActiveSuite {
            key,
            baseline: record.average_elapsed_time,
        });
        Ok(())
    }

    fn on_suite_end(&mut self, suite: &mut RunResult) -> Result<(), HistoryError> {
        // Tolerate an unmatched end, as the test listener does.
        let Some(active) = self.active.pop() else {
            return Ok(());
        };

        let elapsed = suite.elapsed.as_secs();
        let timestamp = suite
            .start_time
            .map(|start| start.format(TIMESTAMP_FORMAT).to_string());

        let record = self.history.record_mut(&active.key, &self.environment);
        record.average_elapsed_time =
            policy::fold_suite_average(active.baseline, suite.passed, elapsed);
        record.push_run(SuiteRun {
            id: record.next_run_id(),
            timestamp,
            passed: suite.passed,
            elapsed_time: elapsed,
        });

        self.store.save(&self.history)
    }
}

#[cfg(test)]
#[path = "suite_tests.rs"]
mod tests;

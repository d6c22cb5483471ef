// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted history document model.
//!
//! Two documents share one shape: a map from name to environment label to
//! a per-environment record. Keys are stored sorted so successive rewrites
//! of the file are byte-stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Runtime history for individual tests: test name → environment → record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestHistory {
    tests: BTreeMap<String, BTreeMap<String, EnvironmentRecord>>,
}

impl TestHistory {
    /// Record for `(test, environment)`, seeded empty when first seen.
    pub fn record_mut(&mut self, test: &str, environment: &str) -> &mut EnvironmentRecord {
        self.tests
            .entry(test.to_string())
            .or_default()
            .entry(environment.to_string())
            .or_default()
    }

    /// Record for `(test, environment)`, if one has been seeded.
    pub fn record(&self, test: &str, environment: &str) -> Option<&EnvironmentRecord> {
        self.tests.get(test)?.get(environment)
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

/// Per-environment runtime history for one test.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentRecord {
    /// Floor moving average over accepted passing runs, in seconds.
    /// Zero means no baseline has been established yet.
    #[serde(default)]
    pub average_runtime: u64,

    /// Recorded runs, newest first.
    #[serde(default)]
    pub runtime_log: Vec<RunRecord>,
}

impl EnvironmentRecord {
    /// Sequence id for the next run: the count of prior runs.
    pub fn next_run_id(&self) -> u64 {
        self.runtime_log.len() as u64
    }

    /// Prepend `run`, keeping the log newest-first.
    pub fn push_run(&mut self, run: RunRecord) {
        self.runtime_log.insert(0, run);
    }
}

/// One recorded test execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Sequence index at insertion time. Opaque; uniqueness is not
    /// enforced across concurrent writers sharing one file.
    pub id: u64,

    /// Start time formatted `%d/%m/%y %H:%M:%S`, absent when the host
    /// supplied none.
    pub timestamp: Option<String>,

    /// Outcome reported by the host, before any delta override.
    pub passed: bool,

    /// Elapsed whole seconds.
    pub runtime: u64,

    /// `None` before a baseline exists, then the delta verdict.
    pub delta_exceeded: Option<bool>,
}

/// Elapsed-time history for suites: suite key → environment → record.
///
/// The suite key is the source filename stripped of directory and
/// extension, falling back to the suite's display name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuiteHistory {
    suites: BTreeMap<String, BTreeMap<String, SuiteEnvironmentRecord>>,
}

impl SuiteHistory {
    /// Record for `(suite, environment)`, seeded empty when first seen.
    pub fn record_mut(&mut self, suite: &str, environment: &str) -> &mut SuiteEnvironmentRecord {
        self.suites
            .entry(suite.to_string())
            .or_default()
            .entry(environment.to_string())
            .or_default()
    }

    /// Record for `(suite, environment)`, if one has been seeded.
    pub fn record(&self, suite: &str, environment: &str) -> Option<&SuiteEnvironmentRecord> {
        self.suites.get(suite)?.get(environment)
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}

/// Per-environment elapsed-time history for one suite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteEnvironmentRecord {
    /// Floor moving average over passing runs, in seconds. `None` until
    /// the first passing run.
    #[serde(default)]
    pub average_elapsed_time: Option<u64>,

    /// Recorded runs, newest first.
    #[serde(default)]
    pub runs: Vec<SuiteRun>,
}

impl SuiteEnvironmentRecord {
    /// Sequence id for the next run: the count of prior runs.
    pub fn next_run_id(&self) -> u64 {
        self.runs.len() as u64
    }

    /// Prepend `run`, keeping the list newest-first.
    pub fn push_run(&mut self, run: SuiteRun) {
        self.runs.insert(0, run);
    }
}

/// One recorded suite execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteRun {
    /// Sequence index at insertion time.
    pub id: u64,

    /// Start time formatted `%d/%m/%y %H:%M`, absent when the host
    /// supplied none.
    pub timestamp: Option<String>,

    /// Outcome reported by the host.
    pub passed: bool,

    /// Elapsed whole seconds.
    pub elapsed_time: u64,
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;

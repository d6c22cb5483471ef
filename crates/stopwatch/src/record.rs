// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The lifecycle hook contract consumed from the host test runner.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::errors::HistoryError;

/// A read/write handle onto one test or suite result.
///
/// The host runner owns the result; listeners receive it mutably at each
/// lifecycle hook and may rewrite `passed` and `message` to override the
/// externally visible outcome.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Display name of the test or suite.
    pub name: String,

    /// Source file the test or suite was loaded from, when the host
    /// knows it.
    pub source: Option<PathBuf>,

    /// Wall-clock start time, when the host recorded one.
    pub start_time: Option<DateTime<Local>>,

    /// Elapsed execution time.
    pub elapsed: Duration,

    /// Pass/fail outcome.
    pub passed: bool,

    /// Displayed failure reason.
    pub message: String,
}

impl RunResult {
    /// A passing result with no timing information.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
            start_time: None,
            elapsed: Duration::ZERO,
            passed: true,
            message: String::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Local>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn with_outcome(mut self, passed: bool) -> Self {
        self.passed = passed;
        self
    }
}

/// Lifecycle events a host test runner delivers, in execution order.
///
/// Hooks default to no-ops so a listener only implements the granularity
/// it tracks. Errors propagate to the host runner, which decides whether
/// the overall run aborts.
pub trait RunListener {
    fn on_suite_start(&mut self, suite: &mut RunResult) -> Result<(), HistoryError> {
        let _ = suite;
        Ok(())
    }

    fn on_test_start(&mut self, test: &mut RunResult) -> Result<(), HistoryError> {
        let _ = test;
        Ok(())
    }

    fn on_test_end(&mut self, test: &mut RunResult) -> Result<(), HistoryError> {
        let _ = test;
        Ok(())
    }

    fn on_suite_end(&mut self, suite: &mut RunResult) -> Result<(), HistoryError> {
        let _ = suite;
        Ok(())
    }
}

//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, TimeZone};
use tempfile::TempDir;

pub use stopwatch::record::{RunListener, RunResult};
pub use stopwatch::{FlushMode, Stopwatch, StopwatchConfig, SuiteStopwatch};

/// A temp directory holding one history file.
pub struct HistoryDir {
    // Held so the directory outlives the test body.
    _dir: TempDir,
    pub logfile: PathBuf,
}

impl HistoryDir {
    /// Base config pointing at this directory's history file, pinned to
    /// the `qa` environment.
    pub fn config(&self) -> StopwatchConfig {
        StopwatchConfig {
            logfile: Some(self.logfile.clone()),
            environment: Some("qa".into()),
            ..Default::default()
        }
    }

    /// A test-level listener with the given tolerance, flushing after
    /// every test so assertions can read the file immediately.
    pub fn listener(&self, timedelta: &str) -> Stopwatch {
        Stopwatch::new(StopwatchConfig {
            timedelta: Some(timedelta.into()),
            flush: FlushMode::EveryTest,
            ..self.config()
        })
        .unwrap()
    }

    /// The raw persisted document.
    pub fn raw_json(&self) -> serde_json::Value {
        let body = std::fs::read_to_string(&self.logfile).unwrap();
        serde_json::from_str(&body).unwrap()
    }
}

pub fn history_dir() -> HistoryDir {
    let dir = TempDir::new().unwrap();
    let logfile = dir.path().join("history.json");
    HistoryDir { _dir: dir, logfile }
}

/// A passing result with the given elapsed seconds.
pub fn passing(name: &str, secs: u64) -> RunResult {
    RunResult::new(name).with_elapsed(Duration::from_secs(secs))
}

/// A failing result with the given elapsed seconds.
pub fn failing(name: &str, secs: u64) -> RunResult {
    passing(name, secs).with_outcome(false)
}

/// A fixed start time so timestamp assertions are deterministic.
pub fn start_time() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2026, 3, 14, 9, 30, 12).unwrap()
}

/// Drives one start/end pair, returning the handle after the listener
/// has had its chance to rewrite it.
pub fn run_test(listener: &mut Stopwatch, mut result: RunResult) -> RunResult {
    listener.on_test_start(&mut result).unwrap();
    listener.on_test_end(&mut result).unwrap();
    result
}

/// Drives one suite start/end pair.
pub fn run_suite(listener: &mut SuiteStopwatch, mut result: RunResult) -> RunResult {
    listener.on_suite_start(&mut result).unwrap();
    listener.on_suite_end(&mut result).unwrap();
    result
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test-runtime regression tracking for host test runners.
//!
//! `stopwatch` listens to a runner's lifecycle events and keeps a JSON
//! history of elapsed times per test and environment. Once a test has a
//! recorded average, a passing run that comes in more than the
//! configured tolerance above it is rewritten as a failure, so
//! performance drift fails the build the same way a broken assertion
//! does.
//!
//! Two listeners share the machinery: [`Stopwatch`] tracks individual
//! tests and enforces the delta policy; [`SuiteStopwatch`] records suite
//! elapsed times without enforcement.
//!
//! ```no_run
//! use std::time::Duration;
//! use stopwatch::record::{RunListener, RunResult};
//! use stopwatch::{Stopwatch, StopwatchConfig};
//!
//! fn main() -> Result<(), stopwatch::StopwatchError> {
//!     let mut listener = Stopwatch::new(StopwatchConfig {
//!         environment: Some("staging".into()),
//!         timedelta: Some("30s".into()),
//!         ..Default::default()
//!     })?;
//!
//!     let mut result = RunResult::new("login works").with_elapsed(Duration::from_secs(4));
//!     listener.on_test_start(&mut result)?;
//!     listener.on_test_end(&mut result)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod history;
pub mod listener;
pub mod policy;
pub mod record;
pub mod store;
pub mod suite;

pub use config::{FlushMode, StopwatchConfig};
pub use errors::{ConfigError, HistoryError, StopwatchError};
pub use listener::Stopwatch;
pub use record::{RunListener, RunResult};
pub use suite::SuiteStopwatch;

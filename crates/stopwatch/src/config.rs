// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Listener configuration and the rules for resolving it.

use std::path::PathBuf;

use crate::errors::ConfigError;

/// Tolerance applied when no timedelta is configured (seconds).
pub(crate) const DEFAULT_TIMEDELTA_SECS: u64 = 10;

/// Environment variable consulted when no explicit label is given.
pub(crate) const ENVIRONMENT_VAR: &str = "DevEnvironment";

/// Label used when neither an explicit environment nor the variable is set.
pub(crate) const DEFAULT_ENVIRONMENT: &str = "main";

/// When the in-memory history document is flushed to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlushMode {
    /// Write the document after every test end.
    EveryTest,

    /// Defer writes to suite end.
    #[default]
    SuiteEnd,
}

/// Options accepted at listener construction.
///
/// Every field has a resolution rule, so `Default` is a valid starting
/// point and callers fill in only what they care about.
#[derive(Debug, Clone, Default)]
pub struct StopwatchConfig {
    /// History file path. Resolved to an absolute path; defaults to a
    /// well-known filename in the working directory.
    pub logfile: Option<PathBuf>,

    /// Partition key separating baselines across deployment contexts.
    /// Falls back to the `DevEnvironment` variable, then `"main"`.
    /// Always lower-cased.
    pub environment: Option<String>,

    /// Tolerance above the recorded average before a passing run is
    /// rejected. Forms like `"90"`, `"5s"`, `"2 min"`, `"1 hour"`.
    /// Defaults to 10 seconds. Unused by [`SuiteStopwatch`].
    ///
    /// [`SuiteStopwatch`]: crate::suite::SuiteStopwatch
    pub timedelta: Option<String>,

    /// Flush cadence for the test-level listener.
    pub flush: FlushMode,
}

/// Resolve the history file path, falling back to `default_name` in the
/// working directory. Emits a one-time notice when the fallback file does
/// not exist yet.
pub(crate) fn resolve_logfile(explicit: Option<PathBuf>, default_name: &str) -> PathBuf {
    let path = match explicit {
        Some(path) => path,
        None => {
            let default = PathBuf::from(default_name);
            if !default.exists() {
                tracing::info!("history file set to default location: ./{default_name}");
            }
            default
        }
    };
    std::path::absolute(&path).unwrap_or(path)
}

/// Resolve the environment label from the explicit option or the
/// `DevEnvironment` variable.
pub(crate) fn resolve_environment(explicit: Option<String>) -> String {
    environment_from(explicit, std::env::var(ENVIRONMENT_VAR).ok())
}

/// Pure resolution step: explicit label wins over the variable's value,
/// empty strings count as unset, and the result is lower-cased.
pub(crate) fn environment_from(explicit: Option<String>, var_value: Option<String>) -> String {
    explicit
        .filter(|label| !label.is_empty())
        .or(var_value.filter(|label| !label.is_empty()))
        .map(|label| label.to_lowercase())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

/// Parse a timedelta string into whole seconds.
///
/// The leading digit run is the magnitude; the remainder is scanned for
/// unit hints, `h` before `m`, anything else meaning seconds. Absent or
/// empty input falls back to [`DEFAULT_TIMEDELTA_SECS`].
pub(crate) fn parse_timedelta(raw: Option<&str>) -> Result<u64, ConfigError> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(DEFAULT_TIMEDELTA_SECS);
    };

    let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
    let value: u64 = digits
        .parse()
        .map_err(|_| ConfigError::InvalidTimedelta(raw.to_string()))?;

    let rest = &raw[digits.len()..];
    let multiplier = if rest.contains('h') {
        60 * 60
    } else if rest.contains('m') {
        60
    } else {
        1
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| ConfigError::InvalidTimedelta(raw.to_string()))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types surfaced to the host runner.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from resolving listener configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The timedelta string did not start with a digit run.
    #[error("invalid timedelta `{0}`: expected digits with an optional h/m suffix")]
    InvalidTimedelta(String),
}

/// Errors from reading or writing the history file.
///
/// A history file that fails to parse is not an error; it is discarded
/// and replaced by an empty document. Everything here is an I/O or
/// serialization fault the host runner decides what to do with.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to create history directory `{path}`")]
    CreateDir {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("failed to create history file `{path}`")]
    Create {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("failed to open history file `{path}`")]
    Open {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("failed to lock history file `{path}`")]
    Lock {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("failed to read history file `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("failed to write history file `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("failed to remove corrupt history file `{path}`")]
    Remove {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("failed to serialize history document for `{path}`")]
    Serialize {
        path: PathBuf,
        #[source]
        error: serde_json::Error,
    },
}

/// Any error a listener can raise at construction time.
#[derive(Debug, Error)]
pub enum StopwatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

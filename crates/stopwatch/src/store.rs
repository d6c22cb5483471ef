// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Locked JSON file store for history documents.
//!
//! The history file may be shared with other test processes writing to
//! the same path. Reads take a shared advisory lock, writes an exclusive
//! one; a lock is held only for the duration of a single read or write,
//! never across hooks. Acquisition blocks with no timeout.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use fs4::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::HistoryError;

/// Owns the history file path and the locking discipline around it.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Opens the store, creating missing parent directories and seeding
    /// the file with an empty JSON object on first use.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|error| HistoryError::CreateDir {
                path: parent.to_path_buf(),
                error,
            })?;
        }

        match OpenOptions::new().create_new(true).write(true).open(&path) {
            Ok(mut file) => {
                file.write_all(b"{}").map_err(|error| HistoryError::Write {
                    path: path.clone(),
                    error,
                })?;
            }
            // Another process may seed the file between the exists check
            // create_new performs and ours; either outcome is fine.
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {}
            Err(error) => {
                return Err(HistoryError::Create { path, error });
            }
        }

        Ok(Self { path })
    }

    /// Absolute path of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document under a shared lock.
    ///
    /// A file that no longer parses is logged, removed from disk, and
    /// replaced by an empty document; that path never errors.
    pub fn load<T>(&self) -> Result<T, HistoryError>
    where
        T: DeserializeOwned + Default,
    {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(T::default());
            }
            Err(error) => {
                return Err(HistoryError::Open {
                    path: self.path.clone(),
                    error,
                });
            }
        };

        let mut locked = LockedFile::shared(file, &self.path)?;
        let mut raw = String::new();
        locked
            .file_mut()
            .read_to_string(&mut raw)
            .map_err(|error| HistoryError::Read {
                path: self.path.clone(),
                error,
            })?;
        drop(locked);

        match serde_json::from_str(&raw) {
            Ok(document) => Ok(document),
            Err(error) => {
                tracing::warn!(
                    "discarding corrupt history file {}: {error}",
                    self.path.display()
                );
                match std::fs::remove_file(&self.path) {
                    Ok(()) => {}
                    Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                    Err(error) => {
                        return Err(HistoryError::Remove {
                            path: self.path.clone(),
                            error,
                        });
                    }
                }
                Ok(T::default())
            }
        }
    }

    /// Writes the whole document under an exclusive lock, pretty-printed
    /// with a 4-space indent.
    pub fn save<T: Serialize>(&self, document: &T) -> Result<(), HistoryError> {
        let body = to_pretty_json(document).map_err(|error| HistoryError::Serialize {
            path: self.path.clone(),
            error,
        })?;

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&self.path)
            .map_err(|error| HistoryError::Open {
                path: self.path.clone(),
                error,
            })?;

        let mut locked = LockedFile::exclusive(file, &self.path)?;

        // Truncate only once the lock is held; an unlocked truncate could
        // clobber a concurrent writer mid-write.
        locked
            .file_mut()
            .set_len(0)
            .map_err(|error| HistoryError::Write {
                path: self.path.clone(),
                error,
            })?;
        locked
            .file_mut()
            .write_all(&body)
            .map_err(|error| HistoryError::Write {
                path: self.path.clone(),
                error,
            })
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Advisory lock held for the duration of one read or write. Released on
/// drop, so every exit path gives it up.
#[derive(Debug)]
struct LockedFile {
    file: File,
}

impl LockedFile {
    fn shared(file: File, path: &Path) -> Result<Self, HistoryError> {
        file.lock_shared().map_err(|error| HistoryError::Lock {
            path: path.to_path_buf(),
            error,
        })?;
        Ok(Self { file })
    }

    fn exclusive(file: File, path: &Path) -> Result<Self, HistoryError> {
        file.lock_exclusive().map_err(|error| HistoryError::Lock {
            path: path.to_path_buf(),
            error,
        })?;
        Ok(Self { file })
    }

    fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        // Errors are moot; closing the file releases the lock anyway.
        _ = self.file.unlock();
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON record store holding the encrypted credential list.

use std::io::Write;
use std::path::{Path, PathBuf};

use lockbox_core::{LockboxError, SecretRecord};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::store::ensure_parent_dir;

/// Ordered list of [`SecretRecord`]s persisted as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records. A store that was never written is empty.
    pub fn load(&self) -> Result<Vec<SecretRecord>, LockboxError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LockboxError::io(
                    format!("reading records from {}", self.path.display()),
                    e,
                ));
            }
        };

        serde_json::from_slice(&data).map_err(|e| {
            LockboxError::Format(format!(
                "record store {} is not a valid record list: {e}",
                self.path.display()
            ))
        })
    }

    /// Replace the store contents.
    ///
    /// Writes to a temporary file beside the store and renames it over the
    /// old one, so a crash mid-write leaves the previous list intact.
    pub fn save(&self, records: &[SecretRecord]) -> Result<(), LockboxError> {
        let io_err = |e: std::io::Error| {
            LockboxError::io(format!("writing records to {}", self.path.display()), e)
        };

        ensure_parent_dir(&self.path)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| LockboxError::Format(format!("failed to serialize records: {e}")))?;

        // NamedTempFile is created with 0600 on Unix.
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        debug!(count = records.len(), path = %self.path.display(), "records saved");
        Ok(())
    }
}

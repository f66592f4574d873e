// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable blob storage for the salt and verifier.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use lockbox_config::VaultConfig;
use lockbox_core::LockboxError;
use tempfile::NamedTempFile;
use tracing::debug;

/// The two write-once blobs that make up a vault's master credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    Salt,
    Verifier,
}

impl BlobKind {
    pub fn label(self) -> &'static str {
        match self {
            BlobKind::Salt => "salt",
            BlobKind::Verifier => "verifier",
        }
    }
}

/// Key-value blob storage consumed by setup and verify.
pub trait BlobStore {
    fn exists(&self, kind: BlobKind) -> Result<bool, LockboxError>;

    /// Read a blob. Missing blobs are an error.
    fn load(&self, kind: BlobKind) -> Result<String, LockboxError>;

    /// Write a blob that must not already exist.
    fn create(&self, kind: BlobKind, contents: &str) -> Result<(), LockboxError>;

    fn remove(&self, kind: BlobKind) -> Result<(), LockboxError>;

    /// Where a blob lives, for messages.
    fn describe(&self, kind: BlobKind) -> PathBuf;
}

/// Blob store backed by two plain files.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    salt_path: PathBuf,
    verifier_path: PathBuf,
}

impl FileBlobStore {
    pub fn new(salt_path: impl Into<PathBuf>, verifier_path: impl Into<PathBuf>) -> Self {
        Self {
            salt_path: salt_path.into(),
            verifier_path: verifier_path.into(),
        }
    }

    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(config.salt_path(), config.verifier_path())
    }

    fn path(&self, kind: BlobKind) -> &Path {
        match kind {
            BlobKind::Salt => &self.salt_path,
            BlobKind::Verifier => &self.verifier_path,
        }
    }
}

impl BlobStore for FileBlobStore {
    fn exists(&self, kind: BlobKind) -> Result<bool, LockboxError> {
        let path = self.path(kind);
        path.try_exists()
            .map_err(|e| LockboxError::io(format!("checking {}", path.display()), e))
    }

    fn load(&self, kind: BlobKind) -> Result<String, LockboxError> {
        let path = self.path(kind);
        std::fs::read_to_string(path).map_err(|e| {
            LockboxError::io(format!("reading {} from {}", kind.label(), path.display()), e)
        })
    }

    fn create(&self, kind: BlobKind, contents: &str) -> Result<(), LockboxError> {
        let path = self.path(kind);
        ensure_parent_dir(path)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |e: std::io::Error| {
            LockboxError::io(format!("writing {} to {}", kind.label(), path.display()), e)
        };

        // The blob only appears at `path` once fully written; a failed write
        // leaves nothing behind. NamedTempFile is created with 0600 on Unix.
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(contents.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist_noclobber(path).map_err(|e| {
            if e.error.kind() == ErrorKind::AlreadyExists {
                LockboxError::AlreadyInitialized {
                    path: path.to_path_buf(),
                }
            } else {
                io_err(e.error)
            }
        })?;

        debug!(path = %path.display(), blob = kind.label(), "blob written");
        Ok(())
    }

    fn remove(&self, kind: BlobKind) -> Result<(), LockboxError> {
        let path = self.path(kind);
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LockboxError::io(format!("removing {}", path.display()), e)),
        }
    }

    fn describe(&self, kind: BlobKind) -> PathBuf {
        self.path(kind).to_path_buf()
    }
}

/// Create the parent directory of `path` (owner-only on Unix) if needed.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), LockboxError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.is_dir() {
        return Ok(());
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(parent)
        .map_err(|e| LockboxError::io(format!("creating directory {}", parent.display()), e))
}

// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Lockbox secrets vault.
//!
//! No variant ever carries the master password, a derived key, or a
//! decrypted field value.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used by every Lockbox crate.
#[derive(Debug, Error)]
pub enum LockboxError {
    /// A store (salt, verifier, or records) could not be read or written.
    #[error("i/o error: {context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    /// Persisted data is not in the expected shape (bad hex, wrong length, bad JSON).
    #[error("format error: {0}")]
    Format(String),

    /// The master password did not match the stored verifier.
    #[error("authentication failed: incorrect master password")]
    AuthenticationFailed,

    /// A stored field could not be decrypted.
    #[error("decryption failed: {0}")]
    Decryption(DecryptFailure),

    /// Required command input is missing or empty.
    #[error("validation error: {0}")]
    Validation(String),

    /// A cryptographic primitive failed (cipher construction, RNG, KDF parameters).
    #[error("cryptographic failure: {0}")]
    Crypto(String),

    /// Setup was requested for a vault that already has a salt.
    #[error("vault already initialized: {}", path.display())]
    AlreadyInitialized { path: PathBuf },

    /// Interactive input could not be obtained.
    #[error("input error: {0}")]
    Input(String),

    /// Configuration could not be turned into runtime parameters.
    #[error("configuration error: {0}")]
    Config(String),
}

impl LockboxError {
    /// Wrap an I/O error with a short description of what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error is the expected wrong-password outcome rather than a fault.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }
}

/// Why a ciphertext field could not be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecryptFailure {
    #[error("ciphertext is not valid hex")]
    MalformedHex,

    #[error("ciphertext is shorter than a nonce")]
    Truncated,

    #[error("authentication tag mismatch -- wrong key or corrupted data")]
    TagMismatch,
}

impl From<DecryptFailure> for LockboxError {
    fn from(reason: DecryptFailure) -> Self {
        Self::Decryption(reason)
    }
}

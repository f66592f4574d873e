// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Lockbox secrets vault.
//!
//! Holds the error taxonomy and the on-disk record shape shared by the
//! config, vault, and binary crates.

pub mod error;
pub mod types;

pub use error::{DecryptFailure, LockboxError};
pub use types::SecretRecord;

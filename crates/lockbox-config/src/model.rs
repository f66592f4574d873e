// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Lockbox secrets vault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level Lockbox configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LockboxConfig {
    /// Where the salt, verifier, and record files live.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Key derivation parameters.
    #[serde(default)]
    pub kdf: KdfConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Interactive shell settings.
    #[serde(default)]
    pub shell: ShellConfig,
}

/// Vault storage layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Directory holding the vault files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Hex-encoded KDF salt, written once at setup.
    #[serde(default = "default_salt_file")]
    pub salt_file: String,

    /// Hex-encoded SHA-256 digest of the derived key.
    #[serde(default = "default_verifier_file")]
    pub verifier_file: String,

    /// JSON array of encrypted records.
    #[serde(default = "default_records_file")]
    pub records_file: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            salt_file: default_salt_file(),
            verifier_file: default_verifier_file(),
            records_file: default_records_file(),
        }
    }
}

impl VaultConfig {
    pub fn salt_path(&self) -> PathBuf {
        self.resolve(&self.salt_file)
    }

    pub fn verifier_path(&self) -> PathBuf {
        self.resolve(&self.verifier_file)
    }

    pub fn records_path(&self) -> PathBuf {
        self.resolve(&self.records_file)
    }

    /// Relative file names are placed under `data_dir`; absolute ones are kept.
    fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new(&self.data_dir).join(path)
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|d| d.join("lockbox").display().to_string())
        .unwrap_or_else(|| ".".to_string())
}

fn default_salt_file() -> String {
    "salt.txt".to_string()
}

fn default_verifier_file() -> String {
    "key_hash.txt".to_string()
}

fn default_records_file() -> String {
    "passwords.json".to_string()
}

/// PBKDF2-HMAC-SHA256 parameters used at setup and every unlock.
///
/// Changing `iterations` after a vault has been created makes the existing
/// master password stop verifying.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KdfConfig {
    /// PBKDF2 iteration count (default: 100000).
    #[serde(default = "default_kdf_iterations")]
    pub iterations: u32,

    /// Salt length in bytes for new vaults (default: 16).
    #[serde(default = "default_kdf_salt_len")]
    pub salt_len: usize,
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            iterations: default_kdf_iterations(),
            salt_len: default_kdf_salt_len(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    100_000
}

fn default_kdf_salt_len() -> usize {
    16
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Interactive shell configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// Master password attempts before giving up.
    #[serde(default = "default_max_unlock_attempts")]
    pub max_unlock_attempts: u32,

    /// Keep readline history for the session (memory only, never written to disk).
    #[serde(default = "default_true")]
    pub history: bool,

    /// Re-launch in a new terminal window when not started from one.
    #[serde(default)]
    pub relaunch_in_terminal: bool,

    /// Terminal command line used for re-launching, e.g. `"xterm -e"`. The
    /// executable path is appended. `None` picks a per-OS default.
    #[serde(default)]
    pub terminal_program: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            max_unlock_attempts: default_max_unlock_attempts(),
            history: true,
            relaunch_in_terminal: false,
            terminal_program: None,
        }
    }
}

fn default_max_unlock_attempts() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::LockboxConfig;

/// Lowest accepted PBKDF2 iteration count.
pub const MIN_KDF_ITERATIONS: u32 = 10_000;

/// Accepted salt lengths in bytes.
pub const SALT_LEN_RANGE: std::ops::RangeInclusive<usize> = 16..=64;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of failing on the first one.
pub fn validate_config(config: &LockboxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.vault.data_dir.trim().is_empty() {
        errors.push(ConfigError::validation("vault.data_dir must not be empty"));
    }

    let files = [
        ("vault.salt_file", &config.vault.salt_file),
        ("vault.verifier_file", &config.vault.verifier_file),
        ("vault.records_file", &config.vault.records_file),
    ];
    for (key, value) in files {
        if value.trim().is_empty() {
            errors.push(ConfigError::validation(format!("{key} must not be empty")));
        }
    }

    let paths = [
        config.vault.salt_path(),
        config.vault.verifier_path(),
        config.vault.records_path(),
    ];
    let distinct: HashSet<_> = paths.iter().collect();
    if distinct.len() != paths.len() {
        errors.push(ConfigError::validation(
            "vault.salt_file, vault.verifier_file and vault.records_file must name different files",
        ));
    }

    if config.kdf.iterations < MIN_KDF_ITERATIONS {
        errors.push(ConfigError::validation(format!(
            "kdf.iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
            config.kdf.iterations
        )));
    }

    if !SALT_LEN_RANGE.contains(&config.kdf.salt_len) {
        errors.push(ConfigError::validation(format!(
            "kdf.salt_len must be between {} and {} bytes, got {}",
            SALT_LEN_RANGE.start(),
            SALT_LEN_RANGE.end(),
            config.kdf.salt_len
        )));
    }

    let level = config.log.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "log.level `{}` is not one of {}",
            config.log.level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.shell.max_unlock_attempts < 1 {
        errors.push(ConfigError::validation(
            "shell.max_unlock_attempts must be at least 1",
        ));
    }

    if let Some(program) = &config.shell.terminal_program {
        if program.trim().is_empty() {
            errors.push(ConfigError::validation(
                "shell.terminal_program must not be empty when set",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

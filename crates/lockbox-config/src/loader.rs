// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./lockbox.toml` > `~/.config/lockbox/lockbox.toml` >
//! `/etc/lockbox/lockbox.toml`, with `LOCKBOX_` environment overrides on top.

// figment::Error is external and cannot be boxed without a wrapper.
#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::LockboxConfig;

/// Config sections that may be overridden from the environment.
///
/// Any other `LOCKBOX_*` variable (for example `LOCKBOX_MASTER_PASSWORD`) is
/// not configuration and is skipped by the env provider.
pub const ENV_SECTIONS: &[&str] = &["vault", "kdf", "log", "shell"];

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/lockbox/lockbox.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "lockbox.toml";

/// Per-user config file under the XDG config directory, if one exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lockbox").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lockbox/lockbox.toml`
/// 3. `~/.config/lockbox/lockbox.toml`
/// 4. `./lockbox.toml`
/// 5. `LOCKBOX_*` environment variables
pub fn load_config() -> Result<LockboxConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<LockboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LockboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `LOCKBOX_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Uses an explicit section prefix match rather than `Env::split("_")`, since
/// key names contain underscores: `LOCKBOX_SHELL_MAX_UNLOCK_ATTEMPTS` must
/// become `shell.max_unlock_attempts`.
fn env_provider() -> Env {
    Env::prefixed("LOCKBOX_")
        .filter(|key| section_key(key.as_str()).is_some())
        .map(|key| {
            section_key(key.as_str())
                .map(|(section, rest)| format!("{section}.{rest}"))
                .unwrap_or_else(|| key.as_str().to_string())
                .into()
        })
}

/// Split a lowercased env key such as `kdf_salt_len` into `("kdf", "salt_len")`.
fn section_key(key: &str) -> Option<(&'static str, String)> {
    let key = key.to_ascii_lowercase();
    ENV_SECTIONS.iter().find_map(|section| {
        key.strip_prefix(*section)
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|rest| !rest.is_empty())
            .map(|rest| (*section, rest.to_string()))
    })
}

// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Lockbox configuration system.

use lockbox_config::diagnostic::ConfigError;
use lockbox_config::{
    load_and_validate_path, load_and_validate_str, load_config, load_config_from_str,
    LockboxConfig,
};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_lockbox_config() {
    let toml = r#"
[vault]
data_dir = "/tmp/lockbox-test"
salt_file = "salt.hex"
verifier_file = "verifier.hex"
records_file = "records.json"

[kdf]
iterations = 200000
salt_len = 32

[log]
level = "debug"

[shell]
max_unlock_attempts = 5
history = false
relaunch_in_terminal = true
terminal_program = "alacritty"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.vault.data_dir, "/tmp/lockbox-test");
    assert_eq!(config.vault.salt_file, "salt.hex");
    assert_eq!(config.vault.verifier_file, "verifier.hex");
    assert_eq!(config.vault.records_file, "records.json");
    assert_eq!(config.kdf.iterations, 200_000);
    assert_eq!(config.kdf.salt_len, 32);
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.shell.max_unlock_attempts, 5);
    assert!(!config.shell.history);
    assert!(config.shell.relaunch_in_terminal);
    assert_eq!(config.shell.terminal_program.as_deref(), Some("alacritty"));
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty config is valid");
    let defaults = LockboxConfig::default();
    assert_eq!(config.kdf.iterations, defaults.kdf.iterations);
    assert_eq!(config.vault.records_file, defaults.vault.records_file);
}

/// A typo inside a section is rejected and gets a suggestion.
#[test]
fn unknown_kdf_key_produces_suggestion() {
    let toml = r#"
[kdf]
iteratons = 200000
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion, .. }
                if key == "iteratons" && suggestion.as_deref() == Some("iterations")
        )
    });
    assert!(found, "expected an UnknownKey error with a suggestion, got {errors:?}");
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let toml = r#"
[vualt]
data_dir = "/tmp"
"#;
    let err = load_config_from_str(toml).expect_err("should reject unknown section");
    assert!(err.to_string().contains("vualt"), "got: {err}");
}

#[test]
fn wrong_type_is_reported_as_invalid_type() {
    let toml = r#"
[kdf]
iterations = "lots"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Other(_))),
        "got {errors:?}"
    );
}

#[test]
fn semantic_errors_surface_through_load_and_validate() {
    let toml = r#"
[kdf]
iterations = 10
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("kdf.iterations")
    )));
}

#[test]
fn env_overrides_local_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "lockbox.toml",
            r#"
[kdf]
iterations = 150000

[shell]
max_unlock_attempts = 2
"#,
        )?;
        jail.set_env("LOCKBOX_KDF_ITERATIONS", "300000");
        jail.set_env("LOCKBOX_SHELL_MAX_UNLOCK_ATTEMPTS", "7");
        jail.set_env("LOCKBOX_VAULT_DATA_DIR", "/srv/lockbox");

        let config = load_config()?;
        assert_eq!(config.kdf.iterations, 300_000);
        assert_eq!(config.shell.max_unlock_attempts, 7);
        assert_eq!(config.vault.data_dir, "/srv/lockbox");
        Ok(())
    });
}

#[test]
fn master_password_env_var_is_not_configuration() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("LOCKBOX_MASTER_PASSWORD", "hunter2");
        let config = load_config()?;
        assert_eq!(config.kdf.iterations, 100_000);
        Ok(())
    });
}

#[test]
fn explicit_config_path_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[log]\nlevel = \"info\"\n").unwrap();

    let config = load_and_validate_path(&path).expect("explicit file should load");
    assert_eq!(config.log.level, "info");
}

#[test]
fn missing_explicit_config_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let errors = load_and_validate_path(&path).expect_err("missing file should fail");
    assert!(matches!(&errors[0], ConfigError::Other(msg) if msg.contains("does not exist")));
}

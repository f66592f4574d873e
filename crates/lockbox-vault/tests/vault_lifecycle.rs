// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end vault lifecycle over real files: setup, unlock, store, read back.

use lockbox_config::VaultConfig;
use lockbox_core::{DecryptFailure, LockboxError};
use lockbox_vault::{
    setup, unlock, vault_state, verify, FileBlobStore, KdfParameters, RecordStore,
    ScriptedPassphrases, Vault, VaultState, VerifyOutcome,
};
use secrecy::{ExposeSecret, SecretString};
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> VaultConfig {
    VaultConfig {
        data_dir: dir.path().join("vault").display().to_string(),
        ..VaultConfig::default()
    }
}

fn params() -> KdfParameters {
    KdfParameters::new(10_000, 16).unwrap()
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

#[test]
fn first_run_setup_then_second_run_unlocks() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let blobs = FileBlobStore::from_config(&config);

    assert_eq!(vault_state(&blobs).unwrap(), VaultState::Uninitialized);
    let first = setup(&blobs, &secret("Tr0ub4dor"), &params()).unwrap();

    let salt = std::fs::read_to_string(config.salt_path()).unwrap();
    let verifier = std::fs::read_to_string(config.verifier_path()).unwrap();
    assert_eq!(salt.len(), 32);
    assert_eq!(verifier.len(), 64);

    // A later run only sees what is on disk.
    let blobs = FileBlobStore::from_config(&config);
    assert_eq!(vault_state(&blobs).unwrap(), VaultState::Sealed);
    match verify(&blobs, &secret("Tr0ub4dor"), &params()).unwrap() {
        VerifyOutcome::Unlocked(key) => assert_eq!(key.as_bytes(), first.as_bytes()),
        VerifyOutcome::Rejected => panic!("correct password rejected"),
    }
    assert!(matches!(
        verify(&blobs, &secret("tr0ub4dor"), &params()).unwrap(),
        VerifyOutcome::Rejected
    ));
}

#[test]
fn stored_credentials_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let blobs = FileBlobStore::from_config(&config);

    let key = setup(&blobs, &secret("master"), &params()).unwrap();
    Vault::new(key, RecordStore::new(config.records_path()))
        .add("github", "alice@example.com", &secret("hunter2"))
        .unwrap();

    let mut source = ScriptedPassphrases::new(["wrong", "master"]);
    let key = unlock(&blobs, &mut source, &params(), 3).unwrap();
    let vault = Vault::new(key, RecordStore::new(config.records_path()));

    let lookup = vault.get("github").unwrap();
    assert_eq!(lookup.entries.len(), 1);
    assert_eq!(lookup.entries[0].username.expose_secret(), "alice@example.com");
    assert_eq!(lookup.entries[0].password.expose_secret(), "hunter2");
}

#[test]
fn truncated_field_on_disk_fails_only_that_record() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let key = setup(&FileBlobStore::from_config(&config), &secret("pw"), &params()).unwrap();
    let vault = Vault::new(key, RecordStore::new(config.records_path()));

    vault.add("svc", "first", &secret("one")).unwrap();
    vault.add("svc", "second", &secret("two")).unwrap();

    // Drop the last hex character of the first record's password.
    let path = config.records_path();
    let mut records: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let field = records[0]["password"].as_str().unwrap().to_string();
    records[0]["password"] = serde_json::Value::String(field[..field.len() - 1].to_string());
    std::fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).unwrap();

    let lookup = vault.get("svc").unwrap();
    assert_eq!(lookup.entries.len(), 1);
    assert_eq!(lookup.entries[0].password.expose_secret(), "two");
    assert_eq!(lookup.failures.len(), 1);
    assert!(matches!(
        lookup.failures[0].error,
        LockboxError::Decryption(DecryptFailure::MalformedHex)
    ));
}

#[test]
fn wrong_key_cannot_read_another_vaults_records() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let key = setup(&FileBlobStore::from_config(&config), &secret("pw"), &params()).unwrap();
    Vault::new(key, RecordStore::new(config.records_path()))
        .add("svc", "alice", &secret("s3cret"))
        .unwrap();

    let other_dir = TempDir::new().unwrap();
    let other_key = setup(
        &FileBlobStore::from_config(&config_in(&other_dir)),
        &secret("pw"),
        &params(),
    )
    .unwrap();
    let intruder = Vault::new(other_key, RecordStore::new(config.records_path()));

    let lookup = intruder.get("svc").unwrap();
    assert!(lookup.entries.is_empty());
    assert!(matches!(
        lookup.failures[0].error,
        LockboxError::Decryption(DecryptFailure::TagMismatch)
    ));
}

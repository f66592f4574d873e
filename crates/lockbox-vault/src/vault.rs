// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The unlocked vault: add, get, delete, and list over encrypted records.
//!
//! A [`Vault`] can only be built from a [`DerivedKey`], which in turn only
//! comes out of a successful setup or verify. Service names are stored in
//! the clear; usernames and passwords are encrypted field by field.

use lockbox_core::{LockboxError, SecretRecord};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::crypto;
use crate::kdf::DerivedKey;
use crate::records::RecordStore;

/// Shown in listings in place of a username that failed to decrypt.
pub const UNDECRYPTABLE_PLACEHOLDER: &str = "[error: could not decrypt]";

/// A decrypted record, held in memory only.
pub struct RevealedRecord {
    pub service: String,
    pub username: SecretString,
    pub password: SecretString,
}

impl std::fmt::Debug for RevealedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealedRecord")
            .field("service", &self.service)
            .field("username", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A matching record that could not be opened.
#[derive(Debug)]
pub struct RecordFailure {
    /// Index of the record in the store.
    pub position: usize,
    pub error: LockboxError,
}

/// Result of [`Vault::get`]. Both lists empty means nothing is stored for the service.
#[derive(Debug, Default)]
pub struct ServiceLookup {
    pub entries: Vec<RevealedRecord>,
    pub failures: Vec<RecordFailure>,
}

impl ServiceLookup {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.failures.is_empty()
    }
}

/// Encrypted record store opened with the master-derived key.
pub struct Vault {
    key: DerivedKey,
    records: RecordStore,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("key", &"[REDACTED]")
            .field("records", &self.records.path())
            .finish()
    }
}

impl Vault {
    pub fn new(key: DerivedKey, records: RecordStore) -> Self {
        Self { key, records }
    }

    #[cfg(test)]
    pub(crate) fn records(&self) -> &RecordStore {
        &self.records
    }

    /// Encrypt and append a credential.
    ///
    /// All three values must be non-blank; nothing is written otherwise.
    /// Adding the same service and username twice keeps both records.
    pub fn add(
        &self,
        service: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<(), LockboxError> {
        require_non_blank("service", service)?;
        require_non_blank("username", username)?;
        require_non_blank("password", password.expose_secret())?;

        let username_ct = crypto::encrypt(username.as_bytes(), &self.key)?;
        let password_ct = crypto::encrypt(password.expose_secret().as_bytes(), &self.key)?;

        let mut records = self.records.load()?;
        records.push(SecretRecord::new(service, username_ct, password_ct));
        self.records.save(&records)?;

        debug!(service = %service, total = records.len(), "record added");
        Ok(())
    }

    /// Decrypt every record stored for `service`.
    ///
    /// A record that fails to open is reported in
    /// [`ServiceLookup::failures`] and does not stop the others.
    pub fn get(&self, service: &str) -> Result<ServiceLookup, LockboxError> {
        let records = self.records.load()?;
        let mut lookup = ServiceLookup::default();

        for (position, record) in records.iter().enumerate() {
            if !record.is_for(service) {
                continue;
            }
            match self.reveal(record) {
                Ok(entry) => lookup.entries.push(entry),
                Err(error) => {
                    warn!(
                        service = %service,
                        position,
                        error = %error,
                        "skipping unreadable record"
                    );
                    lookup.failures.push(RecordFailure { position, error });
                }
            }
        }

        debug!(
            service = %service,
            found = lookup.entries.len(),
            failed = lookup.failures.len(),
            "service lookup"
        );
        Ok(lookup)
    }

    /// Remove every record for `service` whose username decrypts to `username`.
    ///
    /// Returns how many were removed. Records that cannot be decrypted are
    /// kept. The store is only rewritten when something was removed.
    pub fn delete(&self, service: &str, username: &str) -> Result<usize, LockboxError> {
        require_non_blank("service", service)?;
        require_non_blank("username", username)?;

        let records = self.records.load()?;
        let before = records.len();

        let mut kept = Vec::with_capacity(before);
        for (position, record) in records.into_iter().enumerate() {
            if record.is_for(service) {
                match self.open_field(&record.username) {
                    Ok(name) if name.expose_secret() == username => continue,
                    Ok(_) => {}
                    Err(error) => {
                        warn!(
                            service = %service,
                            position,
                            error = %error,
                            "keeping unreadable record"
                        );
                    }
                }
            }
            kept.push(record);
        }

        let removed = before - kept.len();
        if removed > 0 {
            self.records.save(&kept)?;
        }
        debug!(service = %service, removed, "delete");
        Ok(removed)
    }

    /// Every record as `(service, masked username)`, in store order.
    pub fn list(&self) -> Result<Vec<(String, String)>, LockboxError> {
        let records = self.records.load()?;
        let listing = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                let masked = match self.open_field(&record.username) {
                    Ok(name) => mask_secret(name.expose_secret()),
                    Err(error) => {
                        warn!(
                            service = %record.service,
                            position,
                            error = %error,
                            "cannot decrypt username"
                        );
                        UNDECRYPTABLE_PLACEHOLDER.to_string()
                    }
                };
                (record.service, masked)
            })
            .collect();
        Ok(listing)
    }

    fn reveal(&self, record: &SecretRecord) -> Result<RevealedRecord, LockboxError> {
        Ok(RevealedRecord {
            service: record.service.clone(),
            username: self.open_field(&record.username)?,
            password: self.open_field(&record.password)?,
        })
    }

    fn open_field(&self, ciphertext_hex: &str) -> Result<SecretString, LockboxError> {
        let plaintext = crypto::decrypt(ciphertext_hex, &self.key)?;
        let text = std::str::from_utf8(&plaintext)
            .map_err(|_| LockboxError::Format("decrypted field is not valid UTF-8".to_string()))?;
        Ok(SecretString::from(text.to_string()))
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<(), LockboxError> {
    if value.trim().is_empty() {
        return Err(LockboxError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Mask a value for display, showing only the first and last 4 characters.
///
/// Short values (< 10 chars) are fully masked as "****".
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_core::DecryptFailure;
    use tempfile::{tempdir, TempDir};
    use tracing_test::traced_test;

    fn vault() -> (Vault, TempDir) {
        let dir = tempdir().unwrap();
        let records = RecordStore::new(dir.path().join("passwords.json"));
        (Vault::new(DerivedKey::from_bytes([7u8; 32]), records), dir)
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn add_then_get_returns_plaintext() {
        let (vault, _dir) = vault();
        vault
            .add("github", "alice@example.com", &secret("hunter2"))
            .unwrap();

        let lookup = vault.get("github").unwrap();
        assert!(lookup.failures.is_empty());
        assert_eq!(lookup.entries.len(), 1);
        let entry = &lookup.entries[0];
        assert_eq!(entry.service, "github");
        assert_eq!(entry.username.expose_secret(), "alice@example.com");
        assert_eq!(entry.password.expose_secret(), "hunter2");
    }

    #[test]
    fn stored_record_holds_only_ciphertext() {
        let (vault, dir) = vault();
        vault
            .add("github", "alice@example.com", &secret("hunter2"))
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("passwords.json")).unwrap();
        assert!(raw.contains("github"));
        assert!(!raw.contains("alice@example.com"));
        assert!(!raw.contains("hunter2"));
    }

    #[test]
    fn add_rejects_blank_fields_without_writing() {
        let (vault, dir) = vault();
        for (s, u, p) in [("", "u", "p"), ("s", "  ", "p"), ("s", "u", "")] {
            let err = vault.add(s, u, &secret(p)).unwrap_err();
            assert!(matches!(err, LockboxError::Validation(_)));
        }
        assert!(!dir.path().join("passwords.json").exists());
    }

    #[test]
    fn duplicates_are_kept() {
        let (vault, _dir) = vault();
        vault.add("mail", "bob", &secret("one")).unwrap();
        vault.add("mail", "bob", &secret("two")).unwrap();

        let lookup = vault.get("mail").unwrap();
        let passwords: Vec<_> = lookup
            .entries
            .iter()
            .map(|e| e.password.expose_secret().to_string())
            .collect();
        assert_eq!(passwords, ["one", "two"]);
    }

    #[test]
    fn get_matches_service_exactly() {
        let (vault, _dir) = vault();
        vault.add("GitHub", "alice", &secret("pw")).unwrap();
        assert!(vault.get("github").unwrap().is_empty());
        assert!(vault.get("Git").unwrap().is_empty());
        assert_eq!(vault.get("GitHub").unwrap().entries.len(), 1);
    }

    #[test]
    fn get_on_empty_store_finds_nothing() {
        let (vault, _dir) = vault();
        assert!(vault.get("anything").unwrap().is_empty());
    }

    #[test]
    fn get_reports_corrupt_record_and_returns_the_rest() {
        let (vault, _dir) = vault();
        vault.add("svc", "first", &secret("pw1")).unwrap();
        vault.add("svc", "second", &secret("pw2")).unwrap();

        let mut records = vault.records().load().unwrap();
        records[0].password.pop();
        vault.records().save(&records).unwrap();

        let lookup = vault.get("svc").unwrap();
        assert_eq!(lookup.entries.len(), 1);
        assert_eq!(lookup.entries[0].username.expose_secret(), "second");
        assert_eq!(lookup.failures.len(), 1);
        assert_eq!(lookup.failures[0].position, 0);
        assert!(matches!(
            lookup.failures[0].error,
            LockboxError::Decryption(DecryptFailure::MalformedHex)
        ));
    }

    #[test]
    fn records_from_another_key_are_failures() {
        let (vault, dir) = vault();
        vault.add("svc", "alice", &secret("pw")).unwrap();

        let other = Vault::new(
            DerivedKey::from_bytes([8u8; 32]),
            RecordStore::new(dir.path().join("passwords.json")),
        );
        let lookup = other.get("svc").unwrap();
        assert!(lookup.entries.is_empty());
        assert!(matches!(
            lookup.failures[0].error,
            LockboxError::Decryption(DecryptFailure::TagMismatch)
        ));
    }

    #[test]
    fn delete_removes_matching_username_only() {
        let (vault, _dir) = vault();
        vault.add("svc", "alice", &secret("a")).unwrap();
        vault.add("svc", "bob", &secret("b")).unwrap();
        vault.add("other", "alice", &secret("c")).unwrap();

        assert_eq!(vault.delete("svc", "alice").unwrap(), 1);

        let remaining = vault.get("svc").unwrap();
        assert_eq!(remaining.entries.len(), 1);
        assert_eq!(remaining.entries[0].username.expose_secret(), "bob");
        assert_eq!(vault.get("other").unwrap().entries.len(), 1);
    }

    #[test]
    fn delete_removes_all_duplicates() {
        let (vault, _dir) = vault();
        vault.add("svc", "alice", &secret("a")).unwrap();
        vault.add("svc", "alice", &secret("b")).unwrap();
        assert_eq!(vault.delete("svc", "alice").unwrap(), 2);
        assert!(vault.get("svc").unwrap().is_empty());
    }

    #[test]
    fn delete_without_match_leaves_store_untouched() {
        let (vault, dir) = vault();
        vault.add("svc", "alice", &secret("a")).unwrap();
        let path = dir.path().join("passwords.json");
        let before = std::fs::read_to_string(&path).unwrap();

        assert_eq!(vault.delete("svc", "carol").unwrap(), 0);
        assert_eq!(vault.delete("nope", "alice").unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn delete_keeps_undecryptable_records() {
        let (vault, _dir) = vault();
        vault.add("svc", "alice", &secret("a")).unwrap();
        vault.add("svc", "alice", &secret("b")).unwrap();

        let mut records = vault.records().load().unwrap();
        records[0].username = "zz".to_string();
        vault.records().save(&records).unwrap();

        assert_eq!(vault.delete("svc", "alice").unwrap(), 1);
        let left = vault.records().load().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].username, "zz");
    }

    #[test]
    fn list_masks_usernames() {
        let (vault, _dir) = vault();
        vault.add("github", "alice@example.com", &secret("pw")).unwrap();
        vault.add("bank", "bob", &secret("pw")).unwrap();

        let listing = vault.list().unwrap();
        assert_eq!(
            listing,
            vec![
                ("github".to_string(), "alic....com".to_string()),
                ("bank".to_string(), "****".to_string()),
            ]
        );
    }

    #[test]
    fn list_marks_undecryptable_usernames() {
        let (vault, _dir) = vault();
        vault.add("svc", "alice@example.com", &secret("pw")).unwrap();
        let mut records = vault.records().load().unwrap();
        records[0].username = "00".repeat(40);
        vault.records().save(&records).unwrap();

        let listing = vault.list().unwrap();
        assert_eq!(listing[0].1, UNDECRYPTABLE_PLACEHOLDER);
    }

    #[test]
    #[traced_test]
    fn plaintext_never_reaches_logs() {
        let (vault, _dir) = vault();
        vault
            .add("svc", "alice@example.com", &secret("correct horse battery"))
            .unwrap();
        let _ = vault.get("svc").unwrap();
        let _ = vault.list().unwrap();
        let _ = vault.delete("svc", "alice@example.com").unwrap();

        assert!(logs_contain("record added"));
        assert!(!logs_contain("alice@example.com"));
        assert!(!logs_contain("correct horse battery"));
    }

    #[test]
    fn debug_output_is_redacted() {
        let (vault, _dir) = vault();
        vault.add("svc", "alice", &secret("hunter2")).unwrap();
        let lookup = vault.get("svc").unwrap();

        let rendered = format!("{vault:?} {lookup:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("alice"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn mask_secret_long_value() {
        assert_eq!(mask_secret("sk-ant-REDACTED"), "sk-a...mnop");
    }

    #[test]
    fn mask_secret_short_value() {
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret("123456789"), "****");
    }

    #[test]
    fn mask_secret_exactly_ten_chars() {
        assert_eq!(mask_secret("1234567890"), "1234...7890");
    }

    #[test]
    fn mask_secret_counts_characters_not_bytes() {
        assert_eq!(mask_secret("ääääbbccdddd"), "ääää...dddd");
        assert_eq!(mask_secret("密码密码密码密码"), "****");
    }
}

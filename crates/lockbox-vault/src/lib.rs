// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-derived encryption for the Lockbox secrets vault.
//!
//! The master password is stretched with PBKDF2-HMAC-SHA256 into a 32-byte
//! key. Only the salt and a SHA-256 verifier of that key are persisted; the
//! key itself encrypts each stored username and password with AES-256-GCM.

pub mod crypto;
pub mod kdf;
pub mod master;
pub mod prompt;
pub mod records;
pub mod store;
pub mod vault;

pub use crypto::{decrypt, encrypt};
pub use kdf::{DerivedKey, KdfParameters};
pub use master::{setup, unlock, vault_state, verify, VaultState, VerifyOutcome};
pub use prompt::{
    new_master_password, read_hidden, PassphraseSource, ScriptedPassphrases, TerminalPrompt,
    MASTER_PASSWORD_ENV_VAR,
};
pub use records::RecordStore;
pub use store::{BlobKind, BlobStore, FileBlobStore};
pub use vault::{mask_secret, RecordFailure, RevealedRecord, ServiceLookup, Vault};

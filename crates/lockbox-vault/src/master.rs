// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password setup and verification.
//!
//! Lifecycle: `Uninitialized --setup--> Sealed --verify ok--> Unlocked`.
//! A rejected password leaves the vault `Sealed` for the rest of the run.
//! The salt and verifier are written once and never rotated.

use lockbox_core::LockboxError;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::kdf::{self, DerivedKey, KdfParameters, Verifier};
use crate::prompt::PassphraseSource;
use crate::store::{BlobKind, BlobStore};

/// Persisted state of the master credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// No salt or verifier yet; `setup` is required.
    Uninitialized,
    /// Salt and verifier exist; `verify` unlocks.
    Sealed,
}

/// Result of checking a password against the stored verifier.
#[derive(Debug)]
pub enum VerifyOutcome {
    Unlocked(DerivedKey),
    Rejected,
}

/// Inspect the store. Exactly one blob present means a broken vault.
pub fn vault_state(store: &dyn BlobStore) -> Result<VaultState, LockboxError> {
    let salt = store.exists(BlobKind::Salt)?;
    let verifier = store.exists(BlobKind::Verifier)?;
    match (salt, verifier) {
        (false, false) => Ok(VaultState::Uninitialized),
        (true, true) => Ok(VaultState::Sealed),
        (present, _) => {
            let (have, missing) = if present {
                (BlobKind::Salt, BlobKind::Verifier)
            } else {
                (BlobKind::Verifier, BlobKind::Salt)
            };
            Err(LockboxError::Format(format!(
                "vault is partially initialized: {} exists at {} but {} is missing at {}",
                have.label(),
                store.describe(have).display(),
                missing.label(),
                store.describe(missing).display(),
            )))
        }
    }
}

/// First-run setup: generate a salt, derive the key, persist salt and verifier.
///
/// Refuses to run when either blob already exists. If the verifier cannot be
/// written, both blobs are removed again so the vault stays uninitialized.
pub fn setup(
    store: &dyn BlobStore,
    password: &SecretString,
    params: &KdfParameters,
) -> Result<DerivedKey, LockboxError> {
    for kind in [BlobKind::Salt, BlobKind::Verifier] {
        if store.exists(kind)? {
            return Err(LockboxError::AlreadyInitialized {
                path: store.describe(kind),
            });
        }
    }

    let salt = kdf::generate_salt(params)?;
    let key = kdf::derive_key(password.expose_secret().as_bytes(), &salt, params);

    store.create(BlobKind::Salt, &hex::encode(&salt))?;
    if let Err(e) = store.create(BlobKind::Verifier, &key.verifier().to_hex()) {
        for kind in [BlobKind::Verifier, BlobKind::Salt] {
            if let Err(cleanup) = store.remove(kind) {
                warn!(
                    blob = kind.label(),
                    error = %cleanup,
                    "failed to roll back after verifier write failure"
                );
            }
        }
        return Err(e);
    }

    info!(
        iterations = params.iterations(),
        salt_len = params.salt_len(),
        "vault master credential created"
    );
    Ok(key)
}

/// Check `password` against the stored verifier.
///
/// A wrong password is `Ok(VerifyOutcome::Rejected)`; unreadable or malformed
/// blobs are errors.
pub fn verify(
    store: &dyn BlobStore,
    password: &SecretString,
    params: &KdfParameters,
) -> Result<VerifyOutcome, LockboxError> {
    let salt = kdf::decode_salt(&store.load(BlobKind::Salt)?)?;
    let stored = Verifier::from_hex(&store.load(BlobKind::Verifier)?)?;

    let candidate = kdf::derive_key(password.expose_secret().as_bytes(), &salt, params);
    if candidate.verifier().matches(&stored) {
        debug!("master password verified");
        Ok(VerifyOutcome::Unlocked(candidate))
    } else {
        Ok(VerifyOutcome::Rejected)
    }
}

/// Prompt for the master password until it verifies or attempts run out.
///
/// Sources that cannot yield a different answer (an environment variable)
/// get a single attempt.
pub fn unlock(
    store: &dyn BlobStore,
    source: &mut dyn PassphraseSource,
    params: &KdfParameters,
    max_attempts: u32,
) -> Result<DerivedKey, LockboxError> {
    let attempts = if source.supports_retry() {
        max_attempts.max(1)
    } else {
        1
    };

    for attempt in 1..=attempts {
        let password = source.read_passphrase("Enter your master password: ")?;
        match verify(store, &password, params)? {
            VerifyOutcome::Unlocked(key) => return Ok(key),
            VerifyOutcome::Rejected => {
                warn!(attempt, remaining = attempts - attempt, "incorrect master password");
                source.notify_rejected(attempts - attempt);
            }
        }
    }

    Err(LockboxError::AuthenticationFailed)
}

// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from the master password.
//!
//! The derived key never leaves process memory. What gets persisted is its
//! [`Verifier`], a SHA-256 digest that lets a later run check a password
//! without being able to recover the key.

use std::num::NonZeroU32;

use lockbox_config::KdfConfig;
use lockbox_core::LockboxError;
use ring::digest;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Derived key length; fixed by AES-256-GCM.
pub const KEY_LEN: usize = 32;

/// Length of a SHA-256 verifier.
pub const VERIFIER_LEN: usize = digest::SHA256_OUTPUT_LEN;

/// Shortest salt accepted when creating or reading a vault.
pub const MIN_SALT_LEN: usize = 16;

/// Parameters for [`derive_key`], passed explicitly into setup and verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParameters {
    iterations: NonZeroU32,
    salt_len: usize,
}

impl KdfParameters {
    pub fn new(iterations: u32, salt_len: usize) -> Result<Self, LockboxError> {
        let iterations = NonZeroU32::new(iterations).ok_or_else(|| {
            LockboxError::Config("KDF iteration count must be non-zero".to_string())
        })?;
        if salt_len < MIN_SALT_LEN {
            return Err(LockboxError::Config(format!(
                "KDF salt must be at least {MIN_SALT_LEN} bytes, got {salt_len}"
            )));
        }
        Ok(Self {
            iterations,
            salt_len,
        })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }

    pub fn salt_len(&self) -> usize {
        self.salt_len
    }
}

impl TryFrom<&KdfConfig> for KdfParameters {
    type Error = LockboxError;

    fn try_from(config: &KdfConfig) -> Result<Self, Self::Error> {
        Self::new(config.iterations, config.salt_len)
    }
}

/// The 32-byte key produced by [`derive_key`], zeroed on drop.
///
/// Debug output never includes the key bytes.
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// One-way digest of this key, safe to persist.
    pub fn verifier(&self) -> Verifier {
        let hash = digest::digest(&digest::SHA256, self.0.as_ref());
        let mut out = [0u8; VERIFIER_LEN];
        out.copy_from_slice(hash.as_ref());
        Verifier(out)
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// SHA-256 of a derived key.
#[derive(Clone, PartialEq, Eq)]
pub struct Verifier([u8; VERIFIER_LEN]);

impl Verifier {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a stored verifier; surrounding whitespace is ignored.
    pub fn from_hex(stored: &str) -> Result<Self, LockboxError> {
        let bytes = hex::decode(stored.trim())
            .map_err(|e| LockboxError::Format(format!("verifier is not valid hex: {e}")))?;
        let bytes: [u8; VERIFIER_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            LockboxError::Format(format!(
                "verifier must be {VERIFIER_LEN} bytes, got {}",
                b.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Constant-time equality; timing does not depend on where the first
    /// differing byte is.
    #[allow(deprecated)]
    pub fn matches(&self, other: &Verifier) -> bool {
        ring::constant_time::verify_slices_are_equal(&self.0, &other.0).is_ok()
    }
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Verifier").field(&self.to_hex()).finish()
    }
}

/// Derive a 32-byte key from `password` and `salt`.
pub fn derive_key(password: &[u8], salt: &[u8], params: &KdfParameters) -> DerivedKey {
    let mut out = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        params.iterations,
        salt,
        password,
        out.as_mut(),
    );
    DerivedKey(out)
}

/// Generate a fresh random salt of `params.salt_len()` bytes from the OS CSPRNG.
pub fn generate_salt(params: &KdfParameters) -> Result<Vec<u8>, LockboxError> {
    let rng = SystemRandom::new();
    let mut salt = vec![0u8; params.salt_len];
    rng.fill(&mut salt)
        .map_err(|_| LockboxError::Crypto("failed to generate random salt".to_string()))?;
    Ok(salt)
}

/// Parse a stored hex salt; surrounding whitespace is ignored.
pub fn decode_salt(stored: &str) -> Result<Vec<u8>, LockboxError> {
    let salt = hex::decode(stored.trim())
        .map_err(|e| LockboxError::Format(format!("salt is not valid hex: {e}")))?;
    if salt.len() < MIN_SALT_LEN {
        return Err(LockboxError::Format(format!(
            "salt must be at least {MIN_SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }
    Ok(salt)
}

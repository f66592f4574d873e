// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM field encryption with hex framing.
//!
//! Every call to [`encrypt`] draws a fresh random 96-bit nonce from the OS
//! CSPRNG and emits `hex(nonce || ciphertext || tag)`. Nonce reuse under one
//! key would break GCM, so nonces are never derived from content.

use lockbox_core::{DecryptFailure, LockboxError};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::kdf::DerivedKey;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

fn cipher_for(key: &DerivedKey) -> Result<LessSafeKey, LockboxError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key.as_bytes())
        .map_err(|_| LockboxError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` and return the hex-encoded `nonce || ciphertext || tag`.
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> Result<String, LockboxError> {
    let cipher = cipher_for(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| LockboxError::Crypto("failed to generate random nonce".to_string()))?;

    // Nonce prefix, then the plaintext sealed in place behind it.
    let mut framed = Vec::with_capacity(NONCE_LEN + plaintext.len() + TAG_LEN);
    framed.extend_from_slice(&nonce_bytes);
    let mut in_out = Zeroizing::new(plaintext.to_vec());
    cipher
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            &mut *in_out,
        )
        .map_err(|_| LockboxError::Crypto("AES-256-GCM encryption failed".to_string()))?;
    framed.extend_from_slice(&in_out);

    Ok(hex::encode(framed))
}

/// Decrypt a value produced by [`encrypt`].
///
/// Fails with [`LockboxError::Decryption`] on malformed hex, input shorter than
/// a nonce, or a tag that does not verify. Never returns unauthenticated bytes.
pub fn decrypt(
    ciphertext_hex: &str,
    key: &DerivedKey,
) -> Result<Zeroizing<Vec<u8>>, LockboxError> {
    let framed = hex::decode(ciphertext_hex).map_err(|_| DecryptFailure::MalformedHex)?;
    if framed.len() < NONCE_LEN {
        return Err(DecryptFailure::Truncated.into());
    }

    let (nonce_bytes, sealed) = framed.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| DecryptFailure::Truncated)?;

    let cipher = cipher_for(key)?;
    let mut in_out = Zeroizing::new(sealed.to_vec());
    let plaintext_len = cipher
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| DecryptFailure::TagMismatch)?
        .len();
    in_out.truncate(plaintext_len);

    Ok(in_out)
}

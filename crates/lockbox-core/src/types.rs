// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record types persisted in the Lockbox record store.

use serde::{Deserialize, Serialize};

/// One stored credential.
///
/// `username` and `password` always hold the hex ciphertext form
/// (`nonce || ciphertext || tag`), never plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    pub service: String,
    pub username: String,
    pub password: String,
}

impl SecretRecord {
    pub fn new(
        service: impl Into<String>,
        username_ciphertext: impl Into<String>,
        password_ciphertext: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            username: username_ciphertext.into(),
            password: password_ciphertext.into(),
        }
    }

    /// Exact, case-sensitive service match.
    pub fn is_for(&self, service: &str) -> bool {
        self.service == service
    }
}

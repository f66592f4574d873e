// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault creation and unlocking at startup.

use lockbox_config::LockboxConfig;
use lockbox_core::LockboxError;
use lockbox_vault::master;
use lockbox_vault::{
    new_master_password, vault_state, DerivedKey, FileBlobStore, KdfParameters, RecordStore,
    TerminalPrompt, Vault, VaultState,
};

/// `lockbox init`: create the vault, refusing one that already exists.
pub fn init_vault(config: &LockboxConfig) -> Result<(), LockboxError> {
    let blobs = FileBlobStore::from_config(&config.vault);
    if vault_state(&blobs)? == VaultState::Sealed {
        return Err(LockboxError::AlreadyInitialized {
            path: config.vault.salt_path(),
        });
    }
    create(&blobs, config)?;
    println!("Vault created in {}", config.vault.data_dir);
    Ok(())
}

/// Unlock the vault, running first-time setup when none exists yet.
pub fn open_vault(config: &LockboxConfig) -> Result<Vault, LockboxError> {
    let blobs = FileBlobStore::from_config(&config.vault);
    let key = match vault_state(&blobs)? {
        VaultState::Uninitialized => {
            eprintln!("No vault found in {}. Creating one.", config.vault.data_dir);
            create(&blobs, config)?
        }
        VaultState::Sealed => {
            let params = KdfParameters::try_from(&config.kdf)?;
            master::unlock(
                &blobs,
                &mut TerminalPrompt,
                &params,
                config.shell.max_unlock_attempts,
            )?
        }
    };
    Ok(Vault::new(key, RecordStore::new(config.vault.records_path())))
}

fn create(blobs: &FileBlobStore, config: &LockboxConfig) -> Result<DerivedKey, LockboxError> {
    let params = KdfParameters::try_from(&config.kdf)?;
    let password = new_master_password()?;
    master::setup(blobs, &password, &params)
}

// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password acquisition via TTY prompt or `LOCKBOX_MASTER_PASSWORD`.

use std::collections::VecDeque;
use std::io::IsTerminal;

use lockbox_core::LockboxError;
use secrecy::{ExposeSecret, SecretString};

/// The environment variable name for providing the master password.
pub const MASTER_PASSWORD_ENV_VAR: &str = "LOCKBOX_MASTER_PASSWORD";

/// Something that can hand out a master password.
pub trait PassphraseSource {
    fn read_passphrase(&mut self, prompt: &str) -> Result<SecretString, LockboxError>;

    /// Whether asking again can produce a different answer.
    fn supports_retry(&self) -> bool {
        true
    }

    /// Called after a rejected attempt.
    fn notify_rejected(&mut self, _remaining: u32) {}
}

/// Reads from `LOCKBOX_MASTER_PASSWORD` if set, otherwise from the terminal
/// without echo.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl PassphraseSource for TerminalPrompt {
    fn read_passphrase(&mut self, prompt: &str) -> Result<SecretString, LockboxError> {
        if let Some(password) = password_from_env() {
            return Ok(password);
        }
        read_hidden(prompt)
    }

    fn supports_retry(&self) -> bool {
        password_from_env().is_none()
    }

    fn notify_rejected(&mut self, remaining: u32) {
        if remaining > 0 {
            eprintln!("Incorrect master password. {remaining} attempt(s) left.");
        } else {
            eprintln!("Incorrect master password.");
        }
    }
}

fn password_from_env() -> Option<SecretString> {
    std::env::var(MASTER_PASSWORD_ENV_VAR)
        .ok()
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

/// Read one line from the terminal without echoing it.
///
/// Fails when stdin is not a terminal.
pub fn read_hidden(prompt: &str) -> Result<SecretString, LockboxError> {
    if !std::io::stdin().is_terminal() {
        return Err(LockboxError::Input(format!(
            "no terminal available for password input. \
             Set {MASTER_PASSWORD_ENV_VAR} or run interactively."
        )));
    }
    eprint!("{prompt}");
    rpassword::read_password()
        .map(SecretString::from)
        .map_err(|e| LockboxError::Input(format!("failed to read password: {e}")))
}

/// Get a new master password for vault creation.
///
/// The environment variable needs no confirmation. At the terminal the
/// password is entered twice and must match; empty passwords are refused.
pub fn new_master_password() -> Result<SecretString, LockboxError> {
    if let Some(password) = password_from_env() {
        return Ok(password);
    }

    let first = read_hidden("Set up master password: ")?;
    let second = read_hidden("Confirm master password: ")?;
    confirm_new_password(first, &second)
}

fn confirm_new_password(
    first: SecretString,
    second: &SecretString,
) -> Result<SecretString, LockboxError> {
    if first.expose_secret() != second.expose_secret() {
        return Err(LockboxError::Input("passwords do not match".to_string()));
    }
    if first.expose_secret().is_empty() {
        return Err(LockboxError::Input(
            "empty master password not allowed".to_string(),
        ));
    }
    Ok(first)
}

/// A fixed sequence of passwords for driving [`unlock`](crate::master::unlock)
/// without a terminal.
pub struct ScriptedPassphrases {
    queue: VecDeque<SecretString>,
    retry: bool,
}

impl ScriptedPassphrases {
    pub fn new<I, S>(passwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: passwords
                .into_iter()
                .map(|p| SecretString::from(p.into()))
                .collect(),
            retry: true,
        }
    }

    /// Behave like a source that cannot change its answer.
    pub fn without_retry(mut self) -> Self {
        self.retry = false;
        self
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl PassphraseSource for ScriptedPassphrases {
    fn read_passphrase(&mut self, _prompt: &str) -> Result<SecretString, LockboxError> {
        self.queue
            .pop_front()
            .ok_or_else(|| LockboxError::Input("no more passwords".to_string()))
    }

    fn supports_retry(&self) -> bool {
        self.retry
    }
}

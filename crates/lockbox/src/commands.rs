// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `add`, `get`, `delete`, and `list`, shared by the command line and the shell.

use std::io::Write;

use clap::Subcommand;
use colored::Colorize;
use lockbox_core::LockboxError;
use lockbox_vault::{read_hidden, ServiceLookup, Vault};
use secrecy::{ExposeSecret, SecretString};

/// Operations on an unlocked vault.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum VaultCommand {
    /// Store a credential. Prompts for the password when `-p` is omitted.
    Add {
        #[arg(short, long)]
        service: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Show every credential stored for a service.
    Get {
        #[arg(short, long)]
        service: String,
    },
    /// Remove the credentials for a service and username.
    Delete {
        #[arg(short, long)]
        service: String,
        #[arg(short, long)]
        username: String,
    },
    /// List services with masked usernames.
    List,
}

/// Run one command against `vault`, writing user-facing output to `out`.
pub fn execute(
    command: VaultCommand,
    vault: &Vault,
    out: &mut dyn Write,
) -> Result<(), LockboxError> {
    match command {
        VaultCommand::Add {
            service,
            username,
            password,
        } => {
            let password = match password {
                Some(password) => SecretString::from(password),
                None => read_hidden(&format!("Password for {service}: "))?,
            };
            vault.add(&service, &username, &password)?;
            emit(out, format_args!("{}", "Entry saved successfully!".green()))
        }
        VaultCommand::Get { service } => {
            let lookup = vault.get(&service)?;
            print_lookup(out, &service, &lookup)
        }
        VaultCommand::Delete { service, username } => {
            match vault.delete(&service, &username)? {
                0 => emit(
                    out,
                    format_args!("No entry found for username {username} for service {service}"),
                ),
                n => emit(
                    out,
                    format_args!(
                        "{}",
                        format!(
                            "Deleted {n} {} for username {username} for service {service}",
                            if n == 1 { "entry" } else { "entries" }
                        )
                        .green()
                    ),
                ),
            }
        }
        VaultCommand::List => {
            let listing = vault.list()?;
            if listing.is_empty() {
                return emit(out, format_args!("The vault is empty."));
            }
            let width = listing.iter().map(|(s, _)| s.chars().count()).max().unwrap_or(0);
            for (service, masked) in &listing {
                emit(out, format_args!("{service:<width$}  {masked}"))?;
            }
            Ok(())
        }
    }
}

fn print_lookup(
    out: &mut dyn Write,
    service: &str,
    lookup: &ServiceLookup,
) -> Result<(), LockboxError> {
    if lookup.is_empty() {
        return emit(out, format_args!("No entry found for that service."));
    }
    for entry in &lookup.entries {
        emit(
            out,
            format_args!(
                "Username: {}, Password: {}",
                entry.username.expose_secret(),
                entry.password.expose_secret()
            ),
        )?;
    }
    for failure in &lookup.failures {
        emit(
            out,
            format_args!(
                "{}: record #{} for {service} could not be read ({})",
                "warning".yellow(),
                failure.position,
                failure.error
            ),
        )?;
    }
    Ok(())
}

fn emit(out: &mut dyn Write, line: std::fmt::Arguments<'_>) -> Result<(), LockboxError> {
    writeln!(out, "{line}").map_err(|e| LockboxError::io("writing output", e))
}

// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockbox shell` command implementation.
//!
//! An interactive REPL over an unlocked vault. Lines are parsed with the same
//! flags as the command line, so `add -s=github -u=alice -p=secret` works in
//! both places. History is kept in memory only and never written to disk.

use clap::{Parser, Subcommand};
use colored::Colorize;
use lockbox_config::ShellConfig;
use lockbox_core::LockboxError;
use lockbox_vault::Vault;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::commands::{self, VaultCommand};

const AVAILABLE: &str = "Available commands: add, get, delete, list, help, exit";

/// One line typed at the shell prompt.
#[derive(Parser, Debug)]
#[command(name = "lockbox", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum ShellCommand {
    #[command(flatten)]
    Vault(VaultCommand),
    /// Leave the shell.
    #[command(alias = "quit")]
    Exit,
}

fn parse_line(line: &str) -> Result<ShellCommand, clap::Error> {
    ShellLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
}

/// Runs the `lockbox shell` interactive REPL until `exit`, Ctrl+C, or Ctrl+D.
pub fn run_shell(vault: &Vault, config: &ShellConfig) -> Result<(), LockboxError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| LockboxError::Input(format!("failed to initialize readline: {e}")))?;

    println!("{}", "Welcome to your Password Manager!".bold().green());
    println!("{AVAILABLE}");

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    println!("Please enter a command.");
                    continue;
                }
                if config.history {
                    let _ = rl.add_history_entry(trimmed);
                }

                match parse_line(trimmed) {
                    Ok(ShellCommand::Exit) => break,
                    Ok(ShellCommand::Vault(command)) => {
                        if let Err(e) = commands::execute(command, vault, &mut std::io::stdout()) {
                            eprintln!("{}: {e}", "error".red());
                        }
                    }
                    Err(e) => {
                        debug!(kind = ?e.kind(), "unparsed shell input");
                        let _ = e.print();
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "Exiting the Password Manager. Goodbye!".dimmed());
    Ok(())
}

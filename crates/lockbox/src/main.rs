// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lockbox - a local, password-protected secrets vault.
//!
//! This is the binary entry point.

mod commands;
mod launch;
mod shell;
mod unlock;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use lockbox_config::LockboxConfig;
use lockbox_core::LockboxError;

use crate::commands::VaultCommand;

/// Lockbox - a local, password-protected secrets vault.
#[derive(Parser, Debug)]
#[command(name = "lockbox", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding the vault files (overrides `vault.data_dir`).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new vault and set its master password.
    Init,
    /// Launch the interactive shell (default).
    Shell,
    #[command(flatten)]
    Vault(VaultCommand),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => lockbox_config::load_and_validate_path(path),
        None => lockbox_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            lockbox_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = &cli.data_dir {
        config.vault.data_dir = dir.display().to_string();
    }

    init_tracing(&config.log.level);
    tracing::debug!(data_dir = %config.vault.data_dir, "configuration loaded");

    match run(cli.command.unwrap_or(Commands::Shell), &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &LockboxConfig) -> Result<(), LockboxError> {
    match command {
        Commands::Init => unlock::init_vault(config),
        Commands::Shell => {
            if config.shell.relaunch_in_terminal && !launch::attached_to_terminal() {
                println!("Launching in a new terminal...");
                return launch::relaunch_in_new_terminal(&config.shell);
            }
            let vault = unlock::open_vault(config)?;
            shell::run_shell(&vault, &config.shell)
        }
        Commands::Vault(command) => {
            let vault = unlock::open_vault(config)?;
            commands::execute(command, &vault, &mut std::io::stdout())
        }
    }
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lockbox={log_level},lockbox_vault={log_level},lockbox_config={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Re-launching the shell in a new terminal window.
//!
//! Used when the binary is started without a terminal (from a file manager,
//! for example) and `shell.relaunch_in_terminal` is enabled.

use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::Path;
use std::process::Command;

use lockbox_config::ShellConfig;
use lockbox_core::LockboxError;
use tracing::info;

/// Whether stdin, stdout, and stderr are all attached to a terminal.
pub fn attached_to_terminal() -> bool {
    std::io::stdin().is_terminal()
        && std::io::stdout().is_terminal()
        && std::io::stderr().is_terminal()
}

/// Start this executable in a new terminal window and return without waiting.
pub fn relaunch_in_new_terminal(config: &ShellConfig) -> Result<(), LockboxError> {
    let exe = std::env::current_exe()
        .map_err(|e| LockboxError::io("locating the lockbox executable", e))?;
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    let mut command = terminal_command(
        config.terminal_program.as_deref(),
        std::env::consts::OS,
        &exe,
        &args,
    )?;
    info!(program = ?command.get_program(), "relaunching in a new terminal");
    command
        .spawn()
        .map_err(|e| LockboxError::io(format!("starting {:?}", command.get_program()), e))?;
    Ok(())
}

/// Build the command that opens `exe` in a terminal.
///
/// A configured program is split on whitespace and `exe` plus `args` are
/// appended to it, so `"xterm -e"` or `"gnome-terminal --"` both work.
/// Otherwise Linux uses `gnome-terminal` and Windows uses `cmd`.
fn terminal_command(
    configured: Option<&str>,
    os: &str,
    exe: &Path,
    args: &[OsString],
) -> Result<Command, LockboxError> {
    let mut command = match configured {
        Some(program_line) => {
            let mut parts = program_line.split_whitespace();
            let program = parts.next().ok_or_else(|| {
                LockboxError::Config("shell.terminal_program is empty".to_string())
            })?;
            let mut command = Command::new(program);
            command.args(parts);
            command
        }
        None => match os {
            "linux" => {
                let mut command = Command::new("gnome-terminal");
                command.arg("--");
                command
            }
            "windows" => {
                let mut command = Command::new("cmd");
                command.args(["/C", "start", "cmd", "/K"]);
                command
            }
            other => {
                return Err(LockboxError::Config(format!(
                    "cannot open a terminal on unsupported operating system: {other}. \
                     Set shell.terminal_program."
                )));
            }
        },
    };
    command.arg(exe).args(args);
    Ok(command)
}

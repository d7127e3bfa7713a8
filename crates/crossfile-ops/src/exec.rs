//! Process spawning: shell commands and default-application launch.
//!
//! Thin wrappers: the surrounding application treats these as black
//! boxes sharing the reply contract.

use std::path::Path;
use std::process::Command;

use serde::Serialize;

use crossfile_core::EngineError;

/// Captured output of a shell command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run a command through the platform shell and capture its output.
pub fn run_command(command: &str) -> Result<ExecOutput, EngineError> {
    let output = shell_command(command)
        .output()
        .map_err(|e| EngineError::other(format!("Failed to run command: {e}")))?;

    Ok(ExecOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// Open a file with the OS default handler, detached.
pub fn open_with_default(path: &Path) -> Result<(), EngineError> {
    if !path.exists() {
        return Err(EngineError::not_found(path));
    }

    opener_command(path)
        .spawn()
        .map(|_| ())
        .map_err(|e| EngineError::other(format!("Failed to open file: {e}")))
}

#[cfg(target_os = "windows")]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(not(target_os = "windows"))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}

#[cfg(target_os = "windows")]
fn opener_command(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(target_os = "macos")]
fn opener_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn opener_command(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

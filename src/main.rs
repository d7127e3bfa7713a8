//! crossfile - one path scheme for the filesystem and ZIP interiors.
//!
//! Usage:
//!   xf list <PATH>                 List a directory or archive folder
//!   xf read <PATH>                 Read a file (text or data URL)
//!   xf copy <SRC> <DST>            Copy across the archive boundary
//!   xf move <SRC> <DST>            Move across the archive boundary
//!   xf rename <PATH> <NAME>        Rename in place
//!   xf delete <PATH>               Delete a file, tree, or archive entry
//!   xf compare <LEFT> <RIGHT>      Compare two directory trees
//!   xf zip <FILES>... -o <ZIP>     Bundle files into an archive
//!   xf size <PATH>                 Total size of a directory tree
//!   xf drives                      List mounted drives
//!   xf exec <COMMAND>              Run a shell command
//!   xf open <PATH>                 Open with the default application
//!   xf run <JSON>                  Execute a raw operation request
//!   xf --help                      Show help
//!
//! Every command prints the engine's JSON reply to stdout. Paths may
//! point inside ZIP archives: `backup.zip/docs/readme.md` addresses an
//! entry the same way `docs/readme.md` addresses a file.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use serde_json::{json, Value};

use crossfile_core::{NullSink, ProgressInfo, ProgressSink};
use crossfile_ops::OperationEngine;

#[derive(Parser)]
#[command(
    name = "crossfile",
    version,
    about = "A dual-space file engine for the filesystem and ZIP archive interiors",
    long_about = "crossfile treats ZIP archives as ordinary folders.\n\n\
                  Any PATH argument may continue past a .zip file into the \
                  archive, e.g. `xf list backup.zip/docs`. Replies are JSON \
                  on stdout; progress goes to stderr with --progress."
)]
struct Cli {
    /// Print progress ticks to stderr while the operation runs
    #[arg(short = 'P', long, global = true)]
    progress: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a directory, an archive root, or a folder inside one
    List {
        /// Directory or archive path
        path: String,
    },

    /// Read a file; images come back as base64 data URLs
    Read {
        /// File or archive-entry path
        path: String,
    },

    /// Copy a file or tree, crossing archive boundaries as needed
    Copy {
        source: String,
        destination: String,
    },

    /// Move a file or tree, crossing archive boundaries as needed
    Move {
        source: String,
        destination: String,
    },

    /// Rename a file or directory in place
    Rename {
        path: String,
        /// Bare new name, not a path
        new_name: String,
    },

    /// Delete a file, a directory tree, or an archive entry
    Delete { path: String },

    /// Compare two directory trees
    Compare {
        left: String,
        right: String,

        /// Compare only the top level
        #[arg(long)]
        shallow: bool,
    },

    /// Bundle files and directories into a ZIP archive
    Zip {
        /// Files and directories to add
        #[arg(required = true)]
        files: Vec<String>,

        /// Archive to create or extend
        #[arg(short, long)]
        output: String,
    },

    /// Total size, file count, and directory count of a tree
    Size { path: String },

    /// List mounted drives
    Drives,

    /// Run a shell command and capture its output
    Exec { command: String },

    /// Open a file with the platform default application
    Open { path: String },

    /// Execute a raw JSON operation request
    Run {
        /// A `{"operation": ..., ...}` object
        request: String,
    },
}

/// Prints each tick to stderr, overwriting the line.
struct StderrSink;

impl ProgressSink for StderrSink {
    fn emit(&mut self, info: &ProgressInfo) {
        if info.total > info.current {
            eprint!(
                "\r[{:>3}%] {}/{} {}\x1b[K",
                info.percentage(),
                info.current,
                info.total,
                info.file_name
            );
        } else {
            eprint!("\r[{}] {}\x1b[K", info.current, info.file_name);
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let request = build_request(&cli.command)?;

    let engine = OperationEngine::new();
    let reply = if cli.progress {
        let mut sink = StderrSink;
        let reply = engine.execute_value(&request, &mut sink);
        eprintln!();
        reply
    } else {
        engine.execute_value(&request, &mut NullSink)
    };

    print_footer(&reply);
    println!("{}", serde_json::to_string_pretty(&reply)?);

    if reply["success"] == true {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn build_request(command: &Command) -> Result<Value> {
    let request = match command {
        Command::List { path } => json!({ "operation": "list", "folderPath": path }),
        Command::Read { path } => json!({ "operation": "read", "filePath": path }),
        Command::Copy {
            source,
            destination,
        } => json!({
            "operation": "copy",
            "sourcePath": source,
            "destinationPath": destination,
        }),
        Command::Move {
            source,
            destination,
        } => json!({
            "operation": "move",
            "sourcePath": source,
            "destinationPath": destination,
        }),
        Command::Rename { path, new_name } => json!({
            "operation": "rename",
            "sourcePath": path,
            "newName": new_name,
        }),
        Command::Delete { path } => json!({ "operation": "delete", "targetPath": path }),
        Command::Compare {
            left,
            right,
            shallow,
        } => json!({
            "operation": "compare",
            "leftPath": left,
            "rightPath": right,
            "recursive": !shallow,
        }),
        Command::Zip { files, output } => json!({
            "operation": "zip",
            "files": files,
            "zipFilePath": output,
        }),
        Command::Size { path } => json!({ "operation": "directory-size", "folderPath": path }),
        Command::Drives => json!({ "operation": "drives" }),
        Command::Exec { command } => json!({ "operation": "execute-command", "command": command }),
        Command::Open { path } => json!({ "operation": "execute-file", "filePath": path }),
        Command::Run { request } => {
            serde_json::from_str(request).map_err(|e| eyre!("Invalid request JSON: {e}"))?
        }
    };
    Ok(request)
}

/// Print a one-line human summary to stderr for replies that carry
/// byte counts.
fn print_footer(reply: &Value) {
    if reply["success"] != true {
        return;
    }
    match reply["operation"].as_str() {
        Some("directory-size") => {
            if let Some(bytes) = reply["bytes"].as_u64() {
                eprintln!(
                    "{} in {} files, {} directories",
                    format_size(bytes),
                    reply["files"],
                    reply["directories"]
                );
            }
        }
        Some("list") => {
            if let Some(bytes) = reply["summary"]["totalSize"].as_u64() {
                eprintln!(
                    "{} files, {} directories, {}",
                    reply["summary"]["fileCount"],
                    reply["summary"]["directoryCount"],
                    format_size(bytes)
                );
            }
        }
        _ => {}
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

//! Real-filesystem transfer primitives: copy, move, rename, delete.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crossfile_core::{CancelFlag, EngineError, ProgressInfo, ProgressSink};

/// Outcome of a copy or move, with best-effort counts when cancelled.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOutcome {
    pub files: u64,
    pub bytes: u64,
    /// False when the transfer stopped on cancellation.
    pub completed: bool,
}

/// Copy a file or a whole directory tree to the exact destination
/// path, recreating structure. Totals are precomputed so progress
/// carries a true percentage; the cancel flag is polled between
/// files.
pub fn copy_path(
    source: &Path,
    destination: &Path,
    sink: &mut dyn ProgressSink,
    cancel: &CancelFlag,
) -> Result<TransferOutcome, EngineError> {
    if !source.exists() {
        return Err(EngineError::not_found(source));
    }

    let (total_files, _total_bytes) = calculate_totals(source);
    let mut progress = Progress {
        done: 0,
        total: total_files,
        bytes: 0,
    };

    let completed = if source.is_dir() {
        copy_dir_recursive(source, destination, sink, cancel, &mut progress)?
    } else {
        copy_file(source, destination, sink, cancel, &mut progress)?
    };

    debug!(
        source = %source.display(),
        destination = %destination.display(),
        files = progress.done,
        completed,
        "copied"
    );

    Ok(TransferOutcome {
        files: progress.done,
        bytes: progress.bytes,
        completed,
    })
}

/// Move a file or tree: a plain rename when the OS allows it, copy
/// then delete-source otherwise. A cancelled fallback copy leaves the
/// source in place.
pub fn move_path(
    source: &Path,
    destination: &Path,
    sink: &mut dyn ProgressSink,
    cancel: &CancelFlag,
) -> Result<TransferOutcome, EngineError> {
    if !source.exists() {
        return Err(EngineError::not_found(source));
    }

    if fs::rename(source, destination).is_ok() {
        return Ok(TransferOutcome {
            files: 1,
            bytes: 0,
            completed: true,
        });
    }

    // Cross-device (or similar): fall back to copy + delete.
    let outcome = copy_path(source, destination, sink, cancel)?;
    if outcome.completed {
        delete_path(source)?;
    }
    Ok(outcome)
}

/// Remove a single file or a whole directory tree.
pub fn delete_path(target: &Path) -> Result<(), EngineError> {
    if !target.exists() {
        return Err(EngineError::not_found(target));
    }
    if target.is_dir() {
        fs::remove_dir_all(target).map_err(|e| EngineError::io(target, e))
    } else {
        fs::remove_file(target).map_err(|e| EngineError::io(target, e))
    }
}

/// Rename within the parent directory; the destination is a bare new
/// name, not a path. Returns the new full path.
pub fn rename_in_place(source: &Path, new_name: &str) -> Result<PathBuf, EngineError> {
    if !source.exists() {
        return Err(EngineError::not_found(source));
    }
    validate_filename(new_name)?;

    let parent = source.parent().unwrap_or(Path::new(""));
    let new_path = parent.join(new_name);
    if new_path.exists() && new_path != source {
        return Err(EngineError::other(format!("'{new_name}' already exists")));
    }

    fs::rename(source, &new_path).map_err(|e| EngineError::io(source, e))?;
    Ok(new_path)
}

/// Validate a filename for cross-platform compatibility.
pub fn validate_filename(name: &str) -> Result<(), EngineError> {
    let fail = |message: &str| Err(EngineError::other(message.to_string()));

    if name.is_empty() {
        return fail("Name cannot be empty");
    }
    if name.len() > 255 {
        return fail("Name is too long (max 255 characters)");
    }
    for c in ['/', '\\', '\0'] {
        if name.contains(c) {
            return Err(EngineError::other(format!("Name cannot contain '{c}'")));
        }
    }
    if name.starts_with(' ') || name.ends_with(' ') {
        return fail("Name cannot start or end with spaces");
    }
    if name.ends_with('.') {
        return fail("Name cannot end with a dot");
    }
    if name == "." || name == ".." {
        return fail("'.' and '..' are reserved names");
    }
    Ok(())
}

struct Progress {
    done: u64,
    total: u64,
    bytes: u64,
}

/// Copy one file, emitting a tick. Returns false on cancellation.
fn copy_file(
    source: &Path,
    destination: &Path,
    sink: &mut dyn ProgressSink,
    cancel: &CancelFlag,
    progress: &mut Progress,
) -> Result<bool, EngineError> {
    if cancel.is_cancelled() {
        return Ok(false);
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
    }
    let bytes = fs::copy(source, destination).map_err(|e| EngineError::io(source, e))?;

    progress.done += 1;
    progress.bytes += bytes;
    sink.emit(&ProgressInfo::new(
        progress.done,
        progress.total,
        source.file_name().unwrap_or_default().to_string_lossy(),
    ));
    Ok(true)
}

/// Recursively copy a directory. Returns false on cancellation.
fn copy_dir_recursive(
    source: &Path,
    destination: &Path,
    sink: &mut dyn ProgressSink,
    cancel: &CancelFlag,
    progress: &mut Progress,
) -> Result<bool, EngineError> {
    fs::create_dir_all(destination).map_err(|e| EngineError::io(destination, e))?;

    let entries = fs::read_dir(source).map_err(|e| EngineError::io(source, e))?;
    for entry in entries {
        if cancel.is_cancelled() {
            return Ok(false);
        }

        let entry = entry.map_err(|e| EngineError::io(source, e))?;
        let path = entry.path();
        let dest_path = destination.join(entry.file_name());

        let keep_going = if path.is_dir() {
            copy_dir_recursive(&path, &dest_path, sink, cancel, progress)?
        } else {
            copy_file(&path, &dest_path, sink, cancel, progress)?
        };
        if !keep_going {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Calculate total files and bytes under a source up front.
fn calculate_totals(source: &Path) -> (u64, u64) {
    if source.is_dir() {
        calculate_dir_totals(source)
    } else if let Ok(metadata) = fs::metadata(source) {
        (1, metadata.len())
    } else {
        (0, 0)
    }
}

fn calculate_dir_totals(dir: &Path) -> (u64, u64) {
    let mut files = 0;
    let mut bytes = 0u64;

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                let (f, b) = calculate_dir_totals(&path);
                files += f;
                bytes += b;
            } else if let Ok(metadata) = fs::metadata(&path) {
                files += 1;
                bytes += metadata.len();
            }
        }
    }

    (files, bytes)
}

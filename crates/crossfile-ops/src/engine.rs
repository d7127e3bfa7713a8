//! The operation engine: validate, resolve, execute, report.

use std::path::Path;

use serde_json::{json, Value};
use tracing::debug;

use crossfile_archive::{add_entry, delete_entry, extract_entry, list_entries, read_entry};
use crossfile_core::{
    is_archive_file, CancelFlag, EngineError, NullSink, ProgressInfo, ProgressSink, VPath,
};
use crossfile_walk::{compare_directories, directory_size, CompareConfig};

use crate::drives::list_drives;
use crate::exec::{open_with_default, run_command};
use crate::list::Listing;
use crate::read::ReadOutput;
use crate::request::OperationRequest;
use crate::response::{failure_reply, success_reply};
use crate::transfer::{copy_path, delete_path, move_path, rename_in_place};

/// Dispatches operations against the filesystem and the archive
/// adapter.
///
/// The cancel flag is scoped to one engine instance and shared with
/// every cancellable operation it runs. It is not auto-cleared:
/// callers invoke [`OperationEngine::reset_cancellation`] before each
/// new cancellable operation.
#[derive(Debug, Default)]
pub struct OperationEngine {
    cancel: CancelFlag,
}

impl OperationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the operation currently running on
    /// this engine.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Clear the cancel flag before a new cancellable operation.
    pub fn reset_cancellation(&self) {
        self.cancel.reset();
    }

    /// A clone of the engine's cancel flag, for callers that trigger
    /// cancellation from another thread.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Decode, validate and execute a raw `{operation, ...}` value.
    pub fn execute_value(&self, raw: &Value, sink: &mut dyn ProgressSink) -> Value {
        match OperationRequest::from_value(raw) {
            Ok(request) => self.execute(request, sink),
            Err(e) => failure_reply(&e),
        }
    }

    /// Execute a validated request. Never panics past this boundary;
    /// every failure maps to `{success: false, error}`.
    pub fn execute(&self, request: OperationRequest, sink: &mut dyn ProgressSink) -> Value {
        let operation = request.operation_name();
        debug!(operation, "executing operation");

        match self.dispatch(request, sink) {
            Ok(payload) => success_reply(operation, payload),
            Err(e) => failure_reply(&e),
        }
    }

    fn dispatch(
        &self,
        request: OperationRequest,
        sink: &mut dyn ProgressSink,
    ) -> Result<Value, EngineError> {
        match request {
            OperationRequest::Drives => Ok(json!({ "drives": list_drives() })),
            OperationRequest::List { folder_path } => self.do_list(&folder_path),
            OperationRequest::Read { file_path } => self.do_read(&file_path),
            OperationRequest::Copy {
                source_path,
                destination_path,
            } => self.do_transfer(&source_path, &destination_path, false, sink),
            OperationRequest::Move {
                source_path,
                destination_path,
            } => self.do_transfer(&source_path, &destination_path, true, sink),
            OperationRequest::Rename {
                source_path,
                new_name,
            } => self.do_rename(&source_path, &new_name),
            OperationRequest::Delete { target_path } => self.do_delete(&target_path),
            OperationRequest::Compare {
                left_path,
                right_path,
                recursive,
            } => self.do_compare(&left_path, &right_path, recursive, sink),
            OperationRequest::Zip {
                files,
                zip_file_path,
            } => self.do_zip(&files, &zip_file_path, sink),
            OperationRequest::DirectorySize { folder_path } => self.do_size(&folder_path, sink),
            OperationRequest::ExecuteCommand { command } => {
                serde_json::to_value(run_command(&command)?)
                    .map_err(|e| EngineError::other(e.to_string()))
            }
            OperationRequest::ExecuteFile { file_path } => {
                let target = require_fs(&file_path)?;
                open_with_default(&target)?;
                Ok(json!({ "launched": true, "filePath": file_path }))
            }
        }
    }

    fn do_list(&self, folder_path: &str) -> Result<Value, EngineError> {
        let listing = match VPath::parse(folder_path) {
            VPath::Archive(loc) => Listing::from_archive(list_entries(&loc.archive, &loc.entry)?),
            VPath::Fs(path) => {
                if is_archive_file(&path) {
                    // A bare archive file listed explicitly opens at
                    // its root.
                    Listing::from_archive(list_entries(&path, "")?)
                } else if path.is_dir() {
                    Listing::from_directory(&path)?
                } else if !path.exists() {
                    return Err(EngineError::not_found(path));
                } else {
                    return Err(EngineError::other(format!(
                        "Not a directory: {}",
                        path.display()
                    )));
                }
            }
        };
        serde_json::to_value(listing).map_err(|e| EngineError::other(e.to_string()))
    }

    fn do_read(&self, file_path: &str) -> Result<Value, EngineError> {
        let bytes = match VPath::parse(file_path) {
            VPath::Archive(loc) => read_entry(&loc.archive, &loc.entry)?,
            VPath::Fs(path) => {
                if !path.exists() {
                    return Err(EngineError::not_found(path));
                }
                std::fs::read(&path).map_err(|e| EngineError::io(&path, e))?
            }
        };
        serde_json::to_value(ReadOutput::from_bytes(&bytes))
            .map_err(|e| EngineError::other(e.to_string()))
    }

    fn do_transfer(
        &self,
        source: &str,
        destination: &str,
        is_move: bool,
        sink: &mut dyn ProgressSink,
    ) -> Result<Value, EngineError> {
        let src = VPath::parse(source);
        let dst = VPath::parse(destination);

        let (files, cancelled) = match (&src, &dst) {
            (VPath::Fs(from), VPath::Fs(to)) => {
                let outcome = if is_move {
                    move_path(from, to, sink, &self.cancel)?
                } else {
                    copy_path(from, to, sink, &self.cancel)?
                };
                (outcome.files, !outcome.completed)
            }
            (VPath::Archive(loc), VPath::Fs(to)) => {
                let written = extract_entry(&loc.archive, &loc.entry, to)? as u64;
                if is_move {
                    delete_entry(&loc.archive, &loc.entry)?;
                }
                (written, false)
            }
            (VPath::Fs(from), VPath::Archive(loc)) => {
                if !from.exists() {
                    return Err(EngineError::not_found(from));
                }
                let outcome = add_entry(&loc.archive, from, &loc.entry, sink, &self.cancel)?;
                if is_move && outcome.completed {
                    delete_path(from)?;
                }
                (outcome.files_added as u64, !outcome.completed)
            }
            (VPath::Archive(from), VPath::Archive(to)) => {
                // Bridge through a scratch directory.
                let scratch = tempfile::tempdir()
                    .map_err(|e| EngineError::other(format!("Failed to create scratch: {e}")))?;
                let staged = scratch.path().join("staged");
                extract_entry(&from.archive, &from.entry, &staged)?;
                let outcome = add_entry(&to.archive, &staged, &to.entry, sink, &self.cancel)?;
                if is_move && outcome.completed {
                    delete_entry(&from.archive, &from.entry)?;
                }
                (outcome.files_added as u64, !outcome.completed)
            }
        };

        Ok(json!({
            "sourcePath": source,
            "destinationPath": destination,
            "files": files,
            "cancelled": cancelled,
        }))
    }

    fn do_rename(&self, source_path: &str, new_name: &str) -> Result<Value, EngineError> {
        let source = require_fs(source_path)?;
        let new_path = rename_in_place(&source, new_name)?;
        Ok(json!({
            "sourcePath": source_path,
            "newPath": new_path.to_string_lossy(),
        }))
    }

    fn do_delete(&self, target_path: &str) -> Result<Value, EngineError> {
        match VPath::parse(target_path) {
            VPath::Archive(loc) => {
                let removed = delete_entry(&loc.archive, &loc.entry)?;
                Ok(json!({ "targetPath": target_path, "entriesRemoved": removed }))
            }
            VPath::Fs(path) => {
                delete_path(&path)?;
                Ok(json!({ "targetPath": target_path }))
            }
        }
    }

    fn do_compare(
        &self,
        left_path: &str,
        right_path: &str,
        recursive: bool,
        sink: &mut dyn ProgressSink,
    ) -> Result<Value, EngineError> {
        let left = require_fs(left_path)?;
        let right = require_fs(right_path)?;
        let config = CompareConfig {
            recursive,
            ..Default::default()
        };

        let report = compare_directories(&left, &right, &config, sink, &self.cancel)?;
        Ok(json!({
            "entries": report.entries,
            "summary": report.summary,
            "cancelled": !report.completed,
        }))
    }

    fn do_zip(
        &self,
        files: &[String],
        zip_file_path: &str,
        sink: &mut dyn ProgressSink,
    ) -> Result<Value, EngineError> {
        let archive = match VPath::parse(zip_file_path) {
            VPath::Fs(path) => path,
            VPath::Archive(_) => {
                return Err(EngineError::other(
                    "zipFilePath must name an archive file, not a location inside one",
                ));
            }
        };

        let total = files.len() as u64;
        let mut files_added = 0u64;
        let mut cancelled = false;

        for (index, file) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let source = Path::new(file);
            if !source.exists() {
                return Err(EngineError::not_found(source));
            }
            let internal = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| EngineError::other(format!("Invalid source path: {file}")))?;

            let outcome = add_entry(&archive, source, &internal, &mut NullSink, &self.cancel)?;
            files_added += outcome.files_added as u64;
            sink.emit(&ProgressInfo::new(index as u64 + 1, total, internal));
        }

        Ok(json!({
            "zipFilePath": zip_file_path,
            "filesAdded": files_added,
            "cancelled": cancelled,
        }))
    }

    fn do_size(&self, folder_path: &str, sink: &mut dyn ProgressSink) -> Result<Value, EngineError> {
        let path = require_fs(folder_path)?;
        let report = directory_size(&path, sink, &self.cancel)?;
        Ok(json!({
            "folderPath": folder_path,
            "bytes": report.bytes,
            "files": report.files,
            "directories": report.directories,
            "cancelled": !report.completed,
        }))
    }
}

/// Resolve a parameter that must be a real, existing filesystem path.
fn require_fs(raw: &str) -> Result<std::path::PathBuf, EngineError> {
    match VPath::parse(raw) {
        VPath::Fs(path) => {
            if path.exists() {
                Ok(path)
            } else {
                Err(EngineError::not_found(path))
            }
        }
        VPath::Archive(loc) => Err(EngineError::other(format!(
            "Expected a filesystem path, got an archive location: {}/{}",
            loc.archive.display(),
            loc.entry
        ))),
    }
}

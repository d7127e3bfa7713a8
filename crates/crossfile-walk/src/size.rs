//! Recursive directory sizing.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crossfile_core::{CancelFlag, EngineError, ProgressInfo, ProgressSink};

/// Result of a directory-size walk, with best-effort counts when the
/// walk was cancelled.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeReport {
    pub bytes: u64,
    pub files: u64,
    pub directories: u64,
    pub completed: bool,
}

/// Sum file sizes under `path`, emitting one progress tick per file
/// visited (total unknown in advance) and polling the cancel flag
/// between files.
pub fn directory_size(
    path: &Path,
    sink: &mut dyn ProgressSink,
    cancel: &CancelFlag,
) -> Result<SizeReport, EngineError> {
    if !path.is_dir() {
        return Err(EngineError::not_found(path));
    }

    let mut report = SizeReport {
        completed: true,
        ..Default::default()
    };
    walk(path, sink, cancel, &mut report)?;

    debug!(
        path = %path.display(),
        bytes = report.bytes,
        files = report.files,
        completed = report.completed,
        "sized directory"
    );

    Ok(report)
}

fn walk(
    dir: &Path,
    sink: &mut dyn ProgressSink,
    cancel: &CancelFlag,
    report: &mut SizeReport,
) -> Result<(), EngineError> {
    let entries = std::fs::read_dir(dir).map_err(|e| EngineError::io(dir, e))?;

    for entry in entries {
        if cancel.is_cancelled() {
            report.completed = false;
            return Ok(());
        }

        let entry = entry.map_err(|e| EngineError::io(dir, e))?;
        let path = entry.path();

        if path.is_dir() {
            report.directories += 1;
            walk(&path, sink, cancel, report)?;
            if !report.completed {
                return Ok(());
            }
        } else {
            let meta = entry.metadata().map_err(|e| EngineError::io(&path, e))?;
            report.files += 1;
            report.bytes += meta.len();
            sink.emit(&ProgressInfo::unbounded(
                report.files,
                path.file_name().unwrap_or_default().to_string_lossy(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossfile_core::NullSink;

    #[test]
    fn sums_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), vec![0u8; 100]).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b"), vec![0u8; 50]).unwrap();

        let report = directory_size(dir.path(), &mut NullSink, &CancelFlag::new()).unwrap();
        assert_eq!(report.bytes, 150);
        assert_eq!(report.files, 2);
        assert_eq!(report.directories, 1);
        assert!(report.completed);
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            directory_size(&dir.path().join("gone"), &mut NullSink, &CancelFlag::new()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}

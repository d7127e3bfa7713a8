//! Archive mutation: add and delete entries.
//!
//! ZIP files do not support in-place modification, so every mutation
//! rewrites the archive: untouched entries are raw-copied (no
//! decompress/recompress) into a sibling temp file which then
//! replaces the original atomically at the rename.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crossfile_core::{CancelFlag, EngineError, ProgressInfo, ProgressSink};

use crate::{normalize_internal, open_archive};

/// Outcome of an add, with best-effort counts when cancelled.
#[derive(Debug, Clone, Copy)]
pub struct AddOutcome {
    /// Files written into the archive.
    pub files_added: usize,
    /// Whether the add ran to completion.
    pub completed: bool,
}

/// Add a file, or a whole local directory tree, under `internal`.
///
/// Opens the archive if it exists, starts a new one otherwise.
/// Same-named existing entries are replaced. Directory adds emit one
/// progress tick per file with an unknown total and honor the cancel
/// flag between files; whatever was added before cancellation is
/// still committed.
pub fn add_entry(
    archive: &Path,
    source: &Path,
    internal: &str,
    sink: &mut dyn ProgressSink,
    cancel: &CancelFlag,
) -> Result<AddOutcome, EngineError> {
    if !source.exists() {
        return Err(EngineError::not_found(source));
    }

    let internal = normalize_internal(internal);
    if internal.is_empty() {
        return Err(EngineError::other("internal path cannot be empty"));
    }

    // Collect (local file, entry name) pairs up front.
    let mut additions: Vec<(PathBuf, String)> = Vec::new();
    if source.is_dir() {
        collect_tree(source, &internal, &mut additions)?;
    } else {
        additions.push((source.to_path_buf(), internal.clone()));
    }

    let replaced: std::collections::HashSet<&str> =
        additions.iter().map(|(_, name)| name.as_str()).collect();
    let mut rewrite = Rewrite::begin(archive)?;
    rewrite.copy_existing(|name| !replaced.contains(name))?;

    let mut files_added = 0;
    let mut completed = true;
    for (local, name) in &additions {
        if cancel.is_cancelled() {
            completed = false;
            break;
        }
        rewrite.add_file(local, name)?;
        files_added += 1;
        sink.emit(&ProgressInfo::unbounded(files_added as u64, name.clone()));
    }

    rewrite.commit()?;
    debug!(
        archive = %archive.display(),
        internal = %internal,
        files_added,
        completed,
        "added archive entries"
    );

    Ok(AddOutcome {
        files_added,
        completed,
    })
}

/// Delete the exact entry at `internal`, or every entry under it when
/// it names a directory prefix. Returns the number of entries removed.
///
/// Deleting a missing entry reports [`EngineError::EntryNotFound`]
/// without touching the archive, so a repeated delete never corrupts
/// it.
pub fn delete_entry(archive: &Path, internal: &str) -> Result<usize, EngineError> {
    let internal = normalize_internal(internal);
    let dir_prefix = format!("{internal}/");

    let matches = |name: &str| name == internal || name.starts_with(&dir_prefix);

    // Scan before rewriting: a miss must leave the archive untouched.
    {
        let mut zip = open_archive(archive)?;
        let mut found = false;
        for index in 0..zip.len() {
            let entry = zip
                .by_index_raw(index)
                .map_err(|e| EngineError::archive(archive, e))?;
            if matches(entry.name()) {
                found = true;
                break;
            }
        }
        if !found {
            return Err(EngineError::entry_not_found(archive, internal));
        }
    }

    let mut rewrite = Rewrite::begin(archive)?;
    let removed = rewrite.copy_existing(|name| !matches(name))?;
    rewrite.commit()?;

    debug!(
        archive = %archive.display(),
        internal = %internal,
        removed,
        "deleted archive entries"
    );

    Ok(removed)
}

/// One whole-archive rewrite: temp file, writer, atomic replace.
struct Rewrite {
    archive: PathBuf,
    writer: ZipWriter<File>,
    temp: NamedTempFile,
}

impl Rewrite {
    fn begin(archive: &Path) -> Result<Self, EngineError> {
        let parent = archive.parent().filter(|p| !p.as_os_str().is_empty());
        let temp = match parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(|e| EngineError::io(archive, e))?;
        let file = temp.reopen().map_err(|e| EngineError::io(archive, e))?;

        Ok(Self {
            archive: archive.to_path_buf(),
            writer: ZipWriter::new(file),
            temp,
        })
    }

    /// Raw-copy every existing entry accepted by `keep`. Returns how
    /// many entries were skipped. A no-op when the archive does not
    /// exist yet.
    fn copy_existing(&mut self, keep: impl Fn(&str) -> bool) -> Result<usize, EngineError> {
        if !self.archive.exists() {
            return Ok(0);
        }

        let mut source = open_archive(&self.archive)?;
        let mut skipped = 0;
        for index in 0..source.len() {
            let entry = source
                .by_index_raw(index)
                .map_err(|e| EngineError::archive(&self.archive, e))?;
            if keep(entry.name()) {
                self.writer
                    .raw_copy_file(entry)
                    .map_err(|e| EngineError::archive(&self.archive, e))?;
            } else {
                skipped += 1;
            }
        }
        Ok(skipped)
    }

    fn add_file(&mut self, local: &Path, name: &str) -> Result<(), EngineError> {
        let options = SimpleFileOptions::default();
        self.writer
            .start_file(name, options)
            .map_err(|e| EngineError::archive(&self.archive, e))?;
        let file = File::open(local).map_err(|e| EngineError::io(local, e))?;
        io::copy(&mut BufReader::new(file), &mut self.writer)
            .map_err(|e| EngineError::io(local, e))?;
        Ok(())
    }

    fn commit(mut self) -> Result<(), EngineError> {
        self.writer
            .finish()
            .map_err(|e| EngineError::archive(&self.archive, e))?;
        self.temp
            .persist(&self.archive)
            .map_err(|e| EngineError::io(&self.archive, e.error))?;
        Ok(())
    }
}

/// Recursively collect a local tree as (file, entry name) pairs
/// rooted at `internal`.
fn collect_tree(
    dir: &Path,
    internal: &str,
    out: &mut Vec<(PathBuf, String)>,
) -> Result<(), EngineError> {
    let entries = fs::read_dir(dir).map_err(|e| EngineError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| EngineError::io(dir, e))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let child_internal = format!("{internal}/{name}");
        if path.is_dir() {
            collect_tree(&path, &child_internal, out)?;
        } else {
            out.push((path, child_internal));
        }
    }
    Ok(())
}

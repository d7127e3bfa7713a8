//! Structural and content comparison of two directory trees.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crossfile_core::{CancelFlag, EngineError, ProgressInfo, ProgressSink};

/// Classification of one relative path found under either root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffClass {
    OnlyInLeft,
    OnlyInRight,
    Identical,
    Different,
}

/// One classified relative path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareEntry {
    /// Path relative to the compared roots, `/`-delimited.
    pub relative_path: String,
    pub class: DiffClass,
    pub is_directory: bool,
}

/// Counts per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareSummary {
    pub only_in_left: usize,
    pub only_in_right: usize,
    pub identical: usize,
    pub different: usize,
}

impl CompareSummary {
    fn record(&mut self, class: DiffClass) {
        match class {
            DiffClass::OnlyInLeft => self.only_in_left += 1,
            DiffClass::OnlyInRight => self.only_in_right += 1,
            DiffClass::Identical => self.identical += 1,
            DiffClass::Different => self.different += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.only_in_left + self.only_in_right + self.identical + self.different
    }
}

/// Result of comparing two directory trees.
///
/// Every relative path present under either root appears exactly
/// once in `entries`; the summary tallies the same pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareReport {
    pub entries: Vec<CompareEntry>,
    pub summary: CompareSummary,
    /// False when the walk stopped on cancellation.
    pub completed: bool,
}

/// Configuration for directory comparison.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct CompareConfig {
    /// Recurse into subdirectories present under both roots.
    #[builder(default = "true")]
    pub recursive: bool,

    /// Buffer size for the byte-level content comparison.
    #[builder(default = "8192")]
    pub buffer_size: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            buffer_size: 8192,
        }
    }
}

impl CompareConfig {
    pub fn builder() -> CompareConfigBuilder {
        CompareConfigBuilder::default()
    }
}

/// Compare two directory trees.
///
/// Children are iterated in sorted name order so the output is
/// deterministic for identical inputs. Files are equal when their
/// sizes match and a chunked byte comparison finds no difference;
/// directories are compared structurally and (when `recursive`)
/// recursed into. Progress is emitted per directory visited with an
/// unknown total; the cancel flag is polled per entry.
pub fn compare_directories(
    left: &Path,
    right: &Path,
    config: &CompareConfig,
    sink: &mut dyn ProgressSink,
    cancel: &CancelFlag,
) -> Result<CompareReport, EngineError> {
    if !left.is_dir() {
        return Err(EngineError::not_found(left));
    }
    if !right.is_dir() {
        return Err(EngineError::not_found(right));
    }

    let mut report = CompareReport {
        entries: Vec::new(),
        summary: CompareSummary::default(),
        completed: true,
    };
    let mut dirs_visited = 0u64;

    compare_level(
        left,
        right,
        "",
        config,
        sink,
        cancel,
        &mut report,
        &mut dirs_visited,
    )?;

    debug!(
        left = %left.display(),
        right = %right.display(),
        entries = report.entries.len(),
        completed = report.completed,
        "compared directories"
    );

    Ok(report)
}

#[allow(clippy::too_many_arguments)]
fn compare_level(
    left: &Path,
    right: &Path,
    rel_prefix: &str,
    config: &CompareConfig,
    sink: &mut dyn ProgressSink,
    cancel: &CancelFlag,
    report: &mut CompareReport,
    dirs_visited: &mut u64,
) -> Result<(), EngineError> {
    *dirs_visited += 1;
    sink.emit(&ProgressInfo::unbounded(
        *dirs_visited,
        if rel_prefix.is_empty() { "." } else { rel_prefix },
    ));

    let union = child_union(left, right)?;

    for name in union {
        if cancel.is_cancelled() {
            report.completed = false;
            return Ok(());
        }

        let left_child = left.join(&name);
        let right_child = right.join(&name);
        let rel = if rel_prefix.is_empty() {
            name.clone()
        } else {
            format!("{rel_prefix}/{name}")
        };

        let class = match (left_child.exists(), right_child.exists()) {
            (true, false) => DiffClass::OnlyInLeft,
            (false, true) => DiffClass::OnlyInRight,
            (false, false) => continue,
            (true, true) => classify_pair(&left_child, &right_child, config)?,
        };

        let is_directory = left_child.is_dir() || right_child.is_dir();
        report.summary.record(class);
        report.entries.push(CompareEntry {
            relative_path: rel.clone(),
            class,
            is_directory,
        });

        // Directory pairs recurse; mismatched kinds and one-sided
        // subtrees are classified as a unit at this level.
        if config.recursive && left_child.is_dir() && right_child.is_dir() {
            compare_level(
                &left_child,
                &right_child,
                &rel,
                config,
                sink,
                cancel,
                report,
                dirs_visited,
            )?;
            if !report.completed {
                return Ok(());
            }
        }
    }

    Ok(())
}

/// Sorted union of the child names of both directories.
fn child_union(left: &Path, right: &Path) -> Result<BTreeSet<String>, EngineError> {
    let mut names = child_names(left)?;
    names.append(&mut child_names(right)?);
    Ok(names)
}

/// Sorted child names of one directory; empty when it is not one.
fn child_names(dir: &Path) -> Result<BTreeSet<String>, EngineError> {
    let mut names = BTreeSet::new();
    if !dir.is_dir() {
        return Ok(names);
    }
    let entries = std::fs::read_dir(dir).map_err(|e| EngineError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| EngineError::io(dir, e))?;
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Classify a pair present under both roots.
fn classify_pair(left: &Path, right: &Path, config: &CompareConfig) -> Result<DiffClass, EngineError> {
    match (left.is_dir(), right.is_dir()) {
        // Kind mismatch.
        (true, false) | (false, true) => Ok(DiffClass::Different),
        // Directories compare structurally, by child-set. Content
        // differences below show up on the children themselves.
        (true, true) => {
            if child_names(left)? == child_names(right)? {
                Ok(DiffClass::Identical)
            } else {
                Ok(DiffClass::Different)
            }
        }
        (false, false) => {
            if files_equal(left, right, config.buffer_size)? {
                Ok(DiffClass::Identical)
            } else {
                Ok(DiffClass::Different)
            }
        }
    }
}

/// Size fast path, then chunked byte comparison.
fn files_equal(left: &Path, right: &Path, buffer_size: usize) -> Result<bool, EngineError> {
    let left_meta = std::fs::metadata(left).map_err(|e| EngineError::io(left, e))?;
    let right_meta = std::fs::metadata(right).map_err(|e| EngineError::io(right, e))?;
    if left_meta.len() != right_meta.len() {
        return Ok(false);
    }

    let mut left_file = File::open(left).map_err(|e| EngineError::io(left, e))?;
    let mut right_file = File::open(right).map_err(|e| EngineError::io(right, e))?;
    let mut left_buf = vec![0u8; buffer_size.max(1)];
    let mut right_buf = vec![0u8; buffer_size.max(1)];

    loop {
        let read = left_file
            .read(&mut left_buf)
            .map_err(|e| EngineError::io(left, e))?;
        if read == 0 {
            return Ok(true);
        }
        right_file
            .read_exact(&mut right_buf[..read])
            .map_err(|e| EngineError::io(right, e))?;
        if left_buf[..read] != right_buf[..read] {
            return Ok(false);
        }
    }
}

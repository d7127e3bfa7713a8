//! Virtual path resolution across the filesystem / ZIP boundary.
//!
//! A textual path addresses either a plain filesystem location or a
//! location *inside* a ZIP archive, using the convention
//! `<archive>.zip/<internal-path>`. Parsing never touches the disk and
//! never fails; only [`is_archive_file`] consults the filesystem.

use std::fmt;
use std::path::{Path, PathBuf};

/// A location inside a ZIP archive.
///
/// `archive` uses the host's native separators; `entry` is always
/// `/`-delimited and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLocation {
    /// Path of the archive file on the real filesystem.
    pub archive: PathBuf,
    /// Slash-delimited path of the entry within the archive.
    pub entry: String,
}

/// The result of classifying a textual path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VPath {
    /// A plain filesystem path.
    Fs(PathBuf),
    /// A location inside a ZIP archive.
    Archive(ArchiveLocation),
}

impl VPath {
    /// Parse an arbitrary path string.
    ///
    /// A string classifies as an archive path iff it contains a
    /// case-insensitive `.zip` segment boundary followed by a
    /// non-empty remainder. A bare `archive.zip` with nothing after it
    /// is a plain filesystem path. Nested archives are not resolved:
    /// only the first `.zip` boundary is honored, so `a.zip/b.zip/c`
    /// yields archive `a.zip` with entry `b.zip/c`.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.replace('\\', "/");

        if let Some(boundary) = find_zip_boundary(&normalized) {
            let remainder = normalized[boundary..].trim_start_matches('/');
            if !remainder.is_empty() {
                return Self::Archive(ArchiveLocation {
                    archive: to_native(&normalized[..boundary]),
                    entry: remainder.to_string(),
                });
            }
        }

        Self::Fs(to_native(&normalized))
    }

    /// Whether this path addresses the inside of an archive.
    pub fn is_archive_path(&self) -> bool {
        matches!(self, Self::Archive(_))
    }

    /// The real-filesystem component: the path itself, or the archive
    /// file for archive paths.
    pub fn fs_component(&self) -> &Path {
        match self {
            Self::Fs(path) => path,
            Self::Archive(loc) => &loc.archive,
        }
    }
}

impl fmt::Display for VPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fs(path) => write!(f, "{}", path.display()),
            Self::Archive(loc) => write!(f, "{}/{}", loc.archive.display(), loc.entry),
        }
    }
}

/// Find the index just past the first `.zip` segment boundary, i.e. a
/// case-insensitive `.zip` followed by `/` or end of string.
fn find_zip_boundary(normalized: &str) -> Option<usize> {
    let lower = normalized.to_ascii_lowercase();
    let mut search_from = 0;

    while let Some(pos) = lower[search_from..].find(".zip") {
        let end = search_from + pos + 4;
        if end == lower.len() || lower.as_bytes()[end] == b'/' {
            return Some(end);
        }
        search_from += pos + 1;
    }

    None
}

/// Convert a slash-normalized path back to native separators.
fn to_native(slashed: &str) -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(slashed.replace('/', "\\"))
    } else {
        PathBuf::from(slashed)
    }
}

/// Whether the path names an existing `.zip` file on disk.
///
/// This is the only disk access in this module.
pub fn is_archive_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.to_ascii_lowercase().ends_with(".zip") && path.is_file()
}

//! File entry metadata, the unit of every listing.

use std::fs::Metadata;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// One child of a listed location, backed either by a real directory
/// entry or by a (possibly synthesized) archive entry.
///
/// Serializes to the wire model consumed by the UI:
/// `{name, path, size, created, modified, isDirectory, isFile,
/// isArchiveEntry}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Entry name (not the full path).
    pub name: CompactString,
    /// Full textual path of the entry, in the addressing scheme the
    /// listing was requested with.
    pub path: String,
    /// Size in bytes. Zero for directories and synthesized entries.
    pub size: u64,
    /// Creation time, when the backing store records one.
    pub created: Option<DateTime<Utc>>,
    /// Last modification time, when the backing store records one.
    pub modified: Option<DateTime<Utc>>,
    pub is_directory: bool,
    pub is_file: bool,
    /// Whether this entry lives inside an archive.
    pub is_archive_entry: bool,
}

impl FileEntry {
    /// Build an entry from real filesystem metadata.
    pub fn from_metadata(
        name: impl Into<CompactString>,
        path: impl Into<String>,
        meta: &Metadata,
    ) -> Self {
        let is_dir = meta.is_dir();
        Self {
            name: name.into(),
            path: path.into(),
            size: if is_dir { 0 } else { meta.len() },
            created: meta.created().ok().map(to_utc),
            modified: meta.modified().ok().map(to_utc),
            is_directory: is_dir,
            is_file: !is_dir,
            is_archive_entry: false,
        }
    }

    /// Build an entry for a real archive file record.
    pub fn archive_file(
        name: impl Into<CompactString>,
        path: impl Into<String>,
        size: u64,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size,
            created: None,
            modified,
            is_directory: false,
            is_file: true,
            is_archive_entry: true,
        }
    }

    /// Build a synthesized directory entry, inferred from common
    /// prefixes of archive file records.
    pub fn archive_directory(name: impl Into<CompactString>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size: 0,
            created: None,
            modified: None,
            is_directory: true,
            is_file: false,
            is_archive_entry: true,
        }
    }
}

/// Per-listing counts, carried alongside the files/directories split.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub file_count: usize,
    pub directory_count: usize,
    pub total_size: u64,
}

impl ListingSummary {
    /// Tally a set of entries into a summary.
    pub fn tally<'a>(entries: impl IntoIterator<Item = &'a FileEntry>) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            if entry.is_directory {
                summary.directory_count += 1;
            } else {
                summary.file_count += 1;
                summary.total_size += entry.size;
            }
        }
        summary
    }
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    time.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_directory_has_no_size_or_times() {
        let entry = FileEntry::archive_directory("sub", "a.zip/folder/sub");
        assert!(entry.is_directory);
        assert!(entry.is_archive_entry);
        assert_eq!(entry.size, 0);
        assert!(entry.created.is_none() && entry.modified.is_none());
    }

    #[test]
    fn summary_tallies_files_and_directories() {
        let entries = vec![
            FileEntry::archive_file("a.txt", "z.zip/a.txt", 10, None),
            FileEntry::archive_file("b.txt", "z.zip/b.txt", 32, None),
            FileEntry::archive_directory("d", "z.zip/d"),
        ];
        let summary = ListingSummary::tally(&entries);
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.directory_count, 1);
        assert_eq!(summary.total_size, 42);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let entry = FileEntry::archive_file("a.txt", "z.zip/a.txt", 10, None);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["isArchiveEntry"], true);
        assert_eq!(json["isFile"], true);
        assert_eq!(json["isDirectory"], false);
        assert_eq!(json["size"], 10);
    }
}

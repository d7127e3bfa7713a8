//! Listing: real directories and archive interiors through one shape.

use std::path::Path;

use serde::Serialize;

use crossfile_archive::ArchiveListing;
use crossfile_core::{EngineError, FileEntry, ListingSummary};

/// The reply payload of a `list` operation: a files/directories split
/// with counts, and whether the target resolved into an archive.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub files: Vec<FileEntry>,
    pub directories: Vec<FileEntry>,
    pub summary: ListingSummary,
    pub is_zip_path: bool,
}

impl Listing {
    fn build(files: Vec<FileEntry>, directories: Vec<FileEntry>, is_zip_path: bool) -> Self {
        let summary = ListingSummary::tally(files.iter().chain(directories.iter()));
        Self {
            files,
            directories,
            summary,
            is_zip_path,
        }
    }

    /// List the immediate children of a real directory with stat
    /// metadata, in enumeration order.
    pub fn from_directory(dir: &Path) -> Result<Self, EngineError> {
        let mut files = Vec::new();
        let mut directories = Vec::new();

        let entries = std::fs::read_dir(dir).map_err(|e| EngineError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| EngineError::io(dir, e))?;
            let meta = entry.metadata().map_err(|e| EngineError::io(entry.path(), e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let full = entry.path().to_string_lossy().into_owned();
            let item = FileEntry::from_metadata(name.as_str(), full, &meta);
            if item.is_directory {
                directories.push(item);
            } else {
                files.push(item);
            }
        }

        Ok(Self::build(files, directories, false))
    }

    /// Wrap an archive listing.
    pub fn from_archive(listing: ArchiveListing) -> Self {
        Self::build(listing.files, listing.directories, true)
    }
}

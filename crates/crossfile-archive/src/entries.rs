//! Archive listing with synthesized directory entries.
//!
//! A ZIP central directory records files; directories exist only when
//! a tool wrote an explicit record for them. Listing therefore builds
//! a derived prefix view per call: every entry under the requested
//! internal path contributes either a direct file child or its first
//! path segment as a directory child, deduplicated in first-seen
//! order.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexSet;
use tracing::debug;

use crossfile_core::{EngineError, FileEntry};

use crate::{normalize_internal, open_archive};

/// Direct children of one internal path, split by kind.
///
/// Ordering follows archive enumeration order, not sorted.
#[derive(Debug, Default)]
pub struct ArchiveListing {
    pub files: Vec<FileEntry>,
    pub directories: Vec<FileEntry>,
}

/// List the direct children of `internal` inside `archive`.
///
/// An empty `internal` lists the archive root. Children of deeper
/// levels are never recursed into; a nested subtree shows up only as
/// its top-level directory name.
pub fn list_entries(archive: &Path, internal: &str) -> Result<ArchiveListing, EngineError> {
    let mut zip = open_archive(archive)?;
    let internal = normalize_internal(internal);
    let prefix = if internal.is_empty() {
        String::new()
    } else {
        format!("{internal}/")
    };

    let mut listing = ArchiveListing::default();
    let mut seen_dirs: IndexSet<String> = IndexSet::new();

    for index in 0..zip.len() {
        let entry = zip
            .by_index(index)
            .map_err(|e| EngineError::archive(archive, e))?;
        let name = entry.name().to_string();

        let Some(remainder) = name.strip_prefix(&prefix) else {
            continue;
        };
        let remainder = remainder.trim_end_matches('/');
        if remainder.is_empty() {
            continue;
        }

        match remainder.split_once('/') {
            // Deeper entry: its first segment is a directory child.
            Some((head, _)) => {
                seen_dirs.insert(head.to_string());
            }
            None if entry.is_dir() => {
                seen_dirs.insert(remainder.to_string());
            }
            // One segment, real file record: a direct file child.
            None => {
                let full = format!("{prefix}{remainder}");
                listing.files.push(FileEntry::archive_file(
                    remainder,
                    entry_path(archive, &full),
                    entry.size(),
                    entry.last_modified().and_then(zip_datetime_to_utc),
                ));
            }
        }
    }

    for dir in seen_dirs {
        let full = format!("{prefix}{dir}");
        listing
            .directories
            .push(FileEntry::archive_directory(dir.as_str(), entry_path(archive, &full)));
    }

    debug!(
        archive = %archive.display(),
        internal = %internal,
        files = listing.files.len(),
        directories = listing.directories.len(),
        "listed archive entries"
    );

    Ok(listing)
}

/// Textual path of an entry in the combined addressing scheme.
fn entry_path(archive: &Path, internal: &str) -> String {
    format!("{}/{}", archive.display(), internal)
}

fn zip_datetime_to_utc(dt: zip::DateTime) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(
        dt.year() as i32,
        dt.month() as u32,
        dt.day() as u32,
        dt.hour() as u32,
        dt.minute() as u32,
        dt.second() as u32,
    )
    .single()
}

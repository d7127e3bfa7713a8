//! ZIP archive adapter for crossfile.
//!
//! Presents an archive's entry table as a directory tree addressed by
//! slash-delimited internal paths: listing with synthesized directory
//! entries, entry reads, single-file and subtree extraction, and
//! mutation (add, delete) by whole-archive rewrite.
//!
//! Mutations rewrite the archive to a sibling temp file and rename it
//! over the original, so a failed rewrite never corrupts the archive.
//! Concurrent mutation of the same archive file is not serialized
//! here; callers serialize per archive path.

mod entries;
mod extract;
mod modify;

pub use entries::{list_entries, ArchiveListing};
pub use extract::{extract_entry, read_entry};
pub use modify::{add_entry, delete_entry};

use std::fs::File;
use std::path::Path;

use zip::ZipArchive;

use crossfile_core::EngineError;

/// Open an existing archive for reading, mapping failures to the
/// engine taxonomy.
pub(crate) fn open_archive(archive: &Path) -> Result<ZipArchive<File>, EngineError> {
    let file = File::open(archive).map_err(|e| EngineError::io(archive, e))?;
    ZipArchive::new(file).map_err(|e| EngineError::archive(archive, e))
}

/// Normalize an internal path: forward slashes, no leading or
/// trailing slash.
pub(crate) fn normalize_internal(internal: &str) -> String {
    internal
        .replace('\\', "/")
        .trim_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_slashes() {
        assert_eq!(normalize_internal("/a/b/"), "a/b");
        assert_eq!(normalize_internal("a\\b"), "a/b");
        assert_eq!(normalize_internal(""), "");
    }
}

//! Entry reads and extraction to the real filesystem.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crossfile_core::EngineError;

use crate::{normalize_internal, open_archive};

/// Read one entry's raw bytes.
pub fn read_entry(archive: &Path, internal: &str) -> Result<Vec<u8>, EngineError> {
    let mut zip = open_archive(archive)?;
    let internal = normalize_internal(internal);

    let mut entry = match zip.by_name(&internal) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(EngineError::entry_not_found(archive, internal));
        }
        Err(e) => return Err(EngineError::archive(archive, e)),
    };

    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| EngineError::io(archive, e))?;
    Ok(bytes)
}

/// Extract an entry to `destination` on the real filesystem.
///
/// An internal path matching exactly one file entry extracts as a
/// single file named exactly `destination`. An internal path that
/// prefixes other entries is treated as a directory and its whole
/// subtree is materialized under `destination`, creating intermediate
/// directories as needed. Returns the number of files written.
pub fn extract_entry(
    archive: &Path,
    internal: &str,
    destination: &Path,
) -> Result<usize, EngineError> {
    let mut zip = open_archive(archive)?;
    let internal = normalize_internal(internal);
    let dir_prefix = format!("{internal}/");

    let names: Vec<String> = (0..zip.len())
        .map(|i| {
            zip.by_index_raw(i)
                .map(|e| e.name().to_string())
                .map_err(|e| EngineError::archive(archive, e))
        })
        .collect::<Result<_, _>>()?;

    let is_directory = names
        .iter()
        .any(|name| name.starts_with(&dir_prefix) || *name == dir_prefix);
    let exact_file = names.iter().any(|name| *name == internal);

    if !is_directory && !exact_file {
        return Err(EngineError::entry_not_found(archive, internal));
    }

    let mut written = 0;

    if is_directory {
        fs::create_dir_all(destination).map_err(|e| EngineError::io(destination, e))?;
        for name in &names {
            let Some(rel) = name.strip_prefix(&dir_prefix) else {
                continue;
            };
            if rel.is_empty() {
                continue;
            }
            let out = destination.join(sanitize_relative(rel, archive)?);
            if name.ends_with('/') {
                fs::create_dir_all(&out).map_err(|e| EngineError::io(&out, e))?;
            } else {
                write_entry_to(&mut zip, name, &out, archive)?;
                written += 1;
            }
        }
    } else {
        // Single file, renamed to the exact requested destination.
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
        }
        write_entry_to(&mut zip, &internal, destination, archive)?;
        written = 1;
    }

    debug!(
        archive = %archive.display(),
        internal = %internal,
        destination = %destination.display(),
        written,
        "extracted archive entry"
    );

    Ok(written)
}

fn write_entry_to(
    zip: &mut zip::ZipArchive<File>,
    name: &str,
    out: &Path,
    archive: &Path,
) -> Result<(), EngineError> {
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
    }
    let mut entry = zip
        .by_name(name)
        .map_err(|e| EngineError::archive(archive, e))?;
    let mut file = File::create(out).map_err(|e| EngineError::io(out, e))?;
    io::copy(&mut entry, &mut file).map_err(|e| EngineError::io(out, e))?;
    Ok(())
}

/// Reject entry names that would escape the destination root.
fn sanitize_relative(rel: &str, archive: &Path) -> Result<PathBuf, EngineError> {
    let path = PathBuf::from(rel);
    let escapes = path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        return Err(EngineError::archive(
            archive,
            format!("entry name escapes extraction root: {rel}"),
        ));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_rejects_traversal() {
        let archive = Path::new("a.zip");
        assert!(sanitize_relative("ok/fine.txt", archive).is_ok());
        assert!(sanitize_relative("../escape.txt", archive).is_err());
        assert!(sanitize_relative("nested/../../escape.txt", archive).is_err());
        assert!(sanitize_relative("/abs.txt", archive).is_err());
    }
}

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crossfile_archive::{add_entry, delete_entry, extract_entry, list_entries, read_entry};
use crossfile_core::{CancelFlag, EngineError, NullSink};

/// Build a zip fixture with the given (name, content) file entries.
fn build_zip(path: &Path, entries: &[(&str, &str)]) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn fixture(dir: &Path) -> PathBuf {
    let zip_path = dir.join("box.zip");
    build_zip(
        &zip_path,
        &[
            ("file1.txt", "content1"),
            ("file2.txt", "content2"),
            ("folder1/file1.txt", "f1"),
            ("folder1/file2.txt", "f2"),
            ("folder1/subfolder/file3.txt", "f3"),
        ],
    );
    zip_path
}

#[test]
fn test_root_listing_order_and_split() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = fixture(dir.path());

    let listing = list_entries(&zip_path, "").unwrap();
    assert_eq!(listing.files.len(), 2);
    assert_eq!(listing.files[0].name, "file1.txt");
    assert_eq!(listing.files[1].name, "file2.txt");
    assert_eq!(listing.directories.len(), 1);
    assert_eq!(listing.directories[0].name, "folder1");
    assert!(listing.directories[0].is_archive_entry);
}

#[test]
fn test_listing_does_not_recurse_past_direct_children() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = fixture(dir.path());

    let listing = list_entries(&zip_path, "folder1").unwrap();
    assert_eq!(listing.files.len(), 2, "exactly the two direct files");
    assert_eq!(listing.directories.len(), 1);
    assert_eq!(listing.directories[0].name, "subfolder");
    // file3.txt belongs to subfolder's own listing, not this one.
    assert!(listing.files.iter().all(|f| f.name != "file3.txt"));
}

#[test]
fn test_listing_accepts_trailing_slash_and_missing_archive_fails() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = fixture(dir.path());

    let listing = list_entries(&zip_path, "folder1/").unwrap();
    assert_eq!(listing.files.len(), 2);

    let err = list_entries(&dir.path().join("absent.zip"), "").unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}

#[test]
fn test_read_entry_and_miss() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = fixture(dir.path());

    let bytes = read_entry(&zip_path, "folder1/file2.txt").unwrap();
    assert_eq!(bytes, b"f2");

    let err = read_entry(&zip_path, "no/such/entry.txt").unwrap_err();
    assert!(err.to_string().contains("not found in ZIP"));
}

#[test]
fn test_add_then_read_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("new.zip");
    let source = dir.path().join("hello.txt");
    fs::write(&source, "hello archive").unwrap();

    let outcome = add_entry(&zip_path, &source, "x.txt", &mut NullSink, &CancelFlag::new()).unwrap();
    assert_eq!(outcome.files_added, 1);
    assert!(outcome.completed);

    let bytes = read_entry(&zip_path, "x.txt").unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "hello archive");
}

#[test]
fn test_add_replaces_same_named_entry() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = fixture(dir.path());
    let source = dir.path().join("replacement.txt");
    fs::write(&source, "new content").unwrap();

    add_entry(&zip_path, &source, "file1.txt", &mut NullSink, &CancelFlag::new()).unwrap();

    assert_eq!(read_entry(&zip_path, "file1.txt").unwrap(), b"new content");
    // Untouched siblings survive the rewrite.
    assert_eq!(read_entry(&zip_path, "file2.txt").unwrap(), b"content2");
}

#[test]
fn test_directory_add_then_extract_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let tree = dir.path().join("tree");
    fs::create_dir_all(tree.join("sub")).unwrap();
    fs::write(tree.join("a.txt"), "alpha").unwrap();
    fs::write(tree.join("sub/b.txt"), "beta").unwrap();

    let zip_path = dir.path().join("tree.zip");
    let outcome = add_entry(&zip_path, &tree, "d", &mut NullSink, &CancelFlag::new()).unwrap();
    assert_eq!(outcome.files_added, 2);

    let dest = dir.path().join("out");
    let written = extract_entry(&zip_path, "d", &dest).unwrap();
    assert_eq!(written, 2);
    assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "alpha");
    assert_eq!(fs::read_to_string(dest.join("sub/b.txt")).unwrap(), "beta");
}

#[test]
fn test_single_file_extracts_to_exact_destination_name() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = fixture(dir.path());

    let dest = dir.path().join("renamed-output.txt");
    let written = extract_entry(&zip_path, "folder1/file1.txt", &dest).unwrap();
    assert_eq!(written, 1);
    assert_eq!(fs::read_to_string(&dest).unwrap(), "f1");
}

#[test]
fn test_delete_file_then_directory_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = fixture(dir.path());

    assert_eq!(delete_entry(&zip_path, "file1.txt").unwrap(), 1);
    assert!(read_entry(&zip_path, "file1.txt").is_err());

    // Prefix delete removes the whole subtree.
    assert_eq!(delete_entry(&zip_path, "folder1").unwrap(), 3);
    let listing = list_entries(&zip_path, "").unwrap();
    assert_eq!(listing.files.len(), 1);
    assert!(listing.directories.is_empty());
}

#[test]
fn test_delete_is_idempotent_and_never_corrupts() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = fixture(dir.path());

    delete_entry(&zip_path, "file2.txt").unwrap();
    let err = delete_entry(&zip_path, "file2.txt").unwrap_err();
    assert!(matches!(err, EngineError::EntryNotFound { .. }));

    // The archive is still openable and intact after the miss.
    let listing = list_entries(&zip_path, "").unwrap();
    assert_eq!(listing.files.len(), 1);
    assert_eq!(listing.files[0].name, "file1.txt");
}

#[test]
fn test_cancelled_directory_add_commits_partial_result() {
    let dir = tempfile::tempdir().unwrap();
    let tree = dir.path().join("many");
    fs::create_dir_all(&tree).unwrap();
    for i in 0..20 {
        fs::write(tree.join(format!("f{i:02}.txt")), "x").unwrap();
    }

    let zip_path = dir.path().join("partial.zip");
    let cancel = CancelFlag::new();
    let cancel_after = cancel.clone();
    let mut ticks = 0u64;
    let mut sink = |_: &crossfile_core::ProgressInfo| {
        ticks += 1;
        if ticks == 5 {
            cancel_after.cancel();
        }
    };

    let outcome = add_entry(&zip_path, &tree, "many", &mut sink, &cancel).unwrap();
    assert!(!outcome.completed);
    assert!(outcome.files_added < 20);
    assert_eq!(outcome.files_added, 5);

    // The committed partial archive is valid.
    let listing = list_entries(&zip_path, "many").unwrap();
    assert_eq!(listing.files.len(), 5);
}

//! Core types and traits for crossfile.
//!
//! This crate provides the fundamental data structures shared by the
//! crossfile engine: virtual path resolution across the filesystem /
//! ZIP boundary, file entry metadata, progress reporting, cooperative
//! cancellation, and the error taxonomy.

mod cancel;
mod entry;
mod error;
mod path;
mod progress;

pub use cancel::CancelFlag;
pub use entry::{FileEntry, ListingSummary};
pub use error::EngineError;
pub use path::{is_archive_file, ArchiveLocation, VPath};
pub use progress::{NullSink, ProgressInfo, ProgressSink};

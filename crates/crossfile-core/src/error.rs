//! Error taxonomy for the crossfile engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced anywhere in the engine.
///
/// Every failure is caught at the operation-engine boundary and
/// rendered as a `{success: false, error}` reply; nothing propagates
/// past it as a panic.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required operation parameter was missing or empty.
    #[error("{field} is required")]
    MissingParam { field: &'static str },

    /// A real-filesystem target is absent.
    #[error("Path does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    /// An archive entry is absent.
    #[error("Entry '{entry}' not found in ZIP archive {}", archive.display())]
    EntryNotFound { archive: PathBuf, entry: String },

    /// Underlying filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Underlying archive failure.
    #[error("Archive error in {}: {message}", archive.display())]
    Archive { archive: PathBuf, message: String },

    /// Unrecognized operation name at the dispatch boundary.
    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    /// Anything else worth carrying to the caller verbatim.
    #[error("{message}")]
    Other { message: String },
}

impl EngineError {
    /// Wrap an I/O error with path context, promoting `NotFound`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// A missing real-filesystem target.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// A missing archive entry.
    pub fn entry_not_found(archive: impl Into<PathBuf>, entry: impl Into<String>) -> Self {
        Self::EntryNotFound {
            archive: archive.into(),
            entry: entry.into(),
        }
    }

    /// An archive-level failure with context.
    pub fn archive(archive: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Archive {
            archive: archive.into(),
            message: message.to_string(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_param_message_shape() {
        let err = EngineError::MissingParam { field: "folderPath" };
        assert_eq!(err.to_string(), "folderPath is required");
    }

    #[test]
    fn not_found_message_contains_does_not_exist() {
        let err = EngineError::not_found("/no/such/place");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn entry_not_found_message_names_the_archive() {
        let err = EngineError::entry_not_found("/a/b.zip", "x/y.txt");
        let msg = err.to_string();
        assert!(msg.contains("not found in ZIP"));
        assert!(msg.contains("x/y.txt"));
    }

    #[test]
    fn io_promotes_not_found_kind() {
        let err = EngineError::io(
            "/gone",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn unknown_operation_message_shape() {
        let err = EngineError::UnknownOperation {
            name: "frobnicate".into(),
        };
        assert_eq!(err.to_string(), "Unknown operation: frobnicate");
    }
}

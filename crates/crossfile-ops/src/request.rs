//! The request model: a closed set of operations, each carrying its
//! required parameters.
//!
//! Decoding from JSON is the Validate step of the engine: an
//! unrecognized operation name maps to `UnknownOperation`, a missing
//! or empty required field to `"<field> is required"` using the wire
//! field names.

use serde::Serialize;
use serde_json::Value;

use crossfile_core::EngineError;

/// A validated operation request.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum OperationRequest {
    Drives,
    List {
        #[serde(rename = "folderPath")]
        folder_path: String,
    },
    Read {
        #[serde(rename = "filePath")]
        file_path: String,
    },
    Copy {
        #[serde(rename = "sourcePath")]
        source_path: String,
        #[serde(rename = "destinationPath")]
        destination_path: String,
    },
    Move {
        #[serde(rename = "sourcePath")]
        source_path: String,
        #[serde(rename = "destinationPath")]
        destination_path: String,
    },
    Rename {
        #[serde(rename = "sourcePath")]
        source_path: String,
        #[serde(rename = "newName")]
        new_name: String,
    },
    Delete {
        #[serde(rename = "targetPath")]
        target_path: String,
    },
    Compare {
        #[serde(rename = "leftPath")]
        left_path: String,
        #[serde(rename = "rightPath")]
        right_path: String,
        recursive: bool,
    },
    Zip {
        files: Vec<String>,
        #[serde(rename = "zipFilePath")]
        zip_file_path: String,
    },
    DirectorySize {
        #[serde(rename = "folderPath")]
        folder_path: String,
    },
    ExecuteCommand {
        command: String,
    },
    ExecuteFile {
        #[serde(rename = "filePath")]
        file_path: String,
    },
}

impl OperationRequest {
    /// The operation's wire name.
    pub fn operation_name(&self) -> &'static str {
        match self {
            Self::Drives => "drives",
            Self::List { .. } => "list",
            Self::Read { .. } => "read",
            Self::Copy { .. } => "copy",
            Self::Move { .. } => "move",
            Self::Rename { .. } => "rename",
            Self::Delete { .. } => "delete",
            Self::Compare { .. } => "compare",
            Self::Zip { .. } => "zip",
            Self::DirectorySize { .. } => "directory-size",
            Self::ExecuteCommand { .. } => "execute-command",
            Self::ExecuteFile { .. } => "execute-file",
        }
    }

    /// Decode and validate a raw `{operation, ...params}` value.
    pub fn from_value(value: &Value) -> Result<Self, EngineError> {
        let operation = value
            .get("operation")
            .and_then(Value::as_str)
            .ok_or(EngineError::MissingParam { field: "operation" })?;

        match operation {
            "drives" => Ok(Self::Drives),
            "list" => Ok(Self::List {
                folder_path: require_str(value, "folderPath")?,
            }),
            "read" => Ok(Self::Read {
                file_path: require_str(value, "filePath")?,
            }),
            "copy" => Ok(Self::Copy {
                source_path: require_str(value, "sourcePath")?,
                destination_path: require_str(value, "destinationPath")?,
            }),
            "move" => Ok(Self::Move {
                source_path: require_str(value, "sourcePath")?,
                destination_path: require_str(value, "destinationPath")?,
            }),
            "rename" => Ok(Self::Rename {
                source_path: require_str(value, "sourcePath")?,
                new_name: require_str(value, "newName")?,
            }),
            "delete" => Ok(Self::Delete {
                target_path: require_str(value, "targetPath")?,
            }),
            "compare" => Ok(Self::Compare {
                left_path: require_str(value, "leftPath")?,
                right_path: require_str(value, "rightPath")?,
                recursive: value
                    .get("recursive")
                    .and_then(Value::as_bool)
                    .unwrap_or(true),
            }),
            "zip" => {
                let files = require_str_array(value, "files")?;
                Ok(Self::Zip {
                    files,
                    zip_file_path: require_str(value, "zipFilePath")?,
                })
            }
            "directory-size" => Ok(Self::DirectorySize {
                folder_path: require_str(value, "folderPath")?,
            }),
            "execute-command" => Ok(Self::ExecuteCommand {
                command: require_str(value, "command")?,
            }),
            "execute-file" => Ok(Self::ExecuteFile {
                file_path: require_str(value, "filePath")?,
            }),
            other => Err(EngineError::UnknownOperation {
                name: other.to_string(),
            }),
        }
    }
}

fn require_str(value: &Value, field: &'static str) -> Result<String, EngineError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(EngineError::MissingParam { field })
}

fn require_str_array(value: &Value, field: &'static str) -> Result<Vec<String>, EngineError> {
    let items = value
        .get(field)
        .and_then(Value::as_array)
        .filter(|a| !a.is_empty())
        .ok_or(EngineError::MissingParam { field })?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or(EngineError::MissingParam { field })
        })
        .collect()
}

//! Operation engine for crossfile.
//!
//! Callers submit `{operation, ...params}` requests; the engine
//! validates required parameters, resolves every path argument across
//! the filesystem / ZIP boundary, executes against the real
//! filesystem or the archive adapter, and replies with
//! `{success: true, operation, ...}` or `{success: false, error}`.
//! Long-running operations report progress through an injected sink
//! and poll the engine's cancel flag between work units.

mod drives;
mod engine;
mod exec;
mod list;
mod read;
mod request;
mod response;
mod transfer;

pub use drives::{list_drives, DriveEntry};
pub use engine::OperationEngine;
pub use exec::{open_with_default, run_command, ExecOutput};
pub use list::Listing;
pub use read::ReadOutput;
pub use request::OperationRequest;
pub use response::{failure_reply, success_reply};
pub use transfer::{validate_filename, TransferOutcome};

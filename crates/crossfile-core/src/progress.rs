//! Progress reporting for long-running operations.
//!
//! Sinks are passed into each call rather than stored on the engine,
//! so no reset/clear choreography is needed between invocations.

use serde::{Deserialize, Serialize};

/// One progress tick of a long-running operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInfo {
    /// Work units completed so far.
    pub current: u64,
    /// Total work units. Producers that cannot know the total in
    /// advance reuse `current` here, yielding monotonically
    /// increasing counts rather than a true percentage.
    pub total: u64,
    /// The file currently being processed.
    pub file_name: String,
}

impl ProgressInfo {
    pub fn new(current: u64, total: u64, file_name: impl Into<String>) -> Self {
        Self {
            current,
            total,
            file_name: file_name.into(),
        }
    }

    /// A tick with an unknown total: `current` stands in for `total`.
    pub fn unbounded(current: u64, file_name: impl Into<String>) -> Self {
        Self::new(current, current, file_name)
    }

    /// Progress as a rounded percentage, 0 when the total is zero.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            ((self.current as f64 / self.total as f64) * 100.0).round() as u32
        }
    }
}

/// Receiver for progress ticks.
pub trait ProgressSink {
    fn emit(&mut self, info: &ProgressInfo);
}

impl<F: FnMut(&ProgressInfo)> ProgressSink for F {
    fn emit(&mut self, info: &ProgressInfo) {
        self(info);
    }
}

/// Sink that drops every tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&mut self, _info: &ProgressInfo) {}
}

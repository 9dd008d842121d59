//! Registry entries and the range-read request/reply pair.

use std::path::PathBuf;

use crate::TaskId;

/// Where a task writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLogEntry {
    /// Task the output belongs to.
    pub task_id: TaskId,

    /// Output file path. The file may not exist yet.
    pub path: PathBuf,
}

impl TaskLogEntry {
    /// Create a new entry.
    pub fn new(task_id: impl Into<TaskId>, path: impl Into<PathBuf>) -> Self {
        Self {
            task_id: task_id.into(),
            path: path.into(),
        }
    }
}

/// A request for up to `size` bytes of a task's output, starting at `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeReadRequest {
    /// Task whose output to read.
    pub task_id: TaskId,

    /// Absolute byte position to start reading at.
    pub offset: u64,

    /// Maximum number of bytes to return.
    pub size: usize,
}

impl RangeReadRequest {
    /// Create a new request.
    pub fn new(task_id: impl Into<TaskId>, offset: u64, size: usize) -> Self {
        Self {
            task_id: task_id.into(),
            offset,
            size,
        }
    }
}

/// Result of a range read.
///
/// Normally exactly one of `data` non-empty or `end_of_file` holds. A request
/// for zero bytes gets neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeReadReply {
    /// Bytes read, possibly fewer than requested.
    pub data: Vec<u8>,

    /// No data is available at the requested position right now.
    pub end_of_file: bool,
}

impl RangeReadReply {
    /// A reply carrying data.
    pub fn data(data: Vec<u8>) -> Self {
        Self {
            data,
            end_of_file: false,
        }
    }

    /// The end-of-file reply. Carries no data.
    pub fn end_of_file() -> Self {
        Self {
            data: Vec::new(),
            end_of_file: true,
        }
    }
}

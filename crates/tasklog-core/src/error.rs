//! Core domain errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Core domain errors for tasklog.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No output path was ever registered for the task.
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    /// The registered output path could not be opened.
    ///
    /// Usually transient: the task may not have created its output yet.
    #[error("Failed to open output of task {task_id} at '{}': {source}", .path.display())]
    Open {
        task_id: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

//! tasklog Core Domain Types
//!
//! This crate contains the pieces of the log-tailing service that have real
//! state, with no dependencies on:
//! - Network/gRPC
//! - Async runtime specifics
//!
//! A task launcher registers where each task writes its output with a
//! [`TaskLogRegistry`]; a [`RangeReader`] serves byte ranges of those files.

pub mod entry;
pub mod error;
pub mod ids;
pub mod range_read;
pub mod registry;

// Re-export commonly used types
pub use entry::{RangeReadReply, RangeReadRequest, TaskLogEntry};
pub use error::CoreError;
pub use ids::TaskId;
pub use range_read::RangeReader;
pub use registry::TaskLogRegistry;

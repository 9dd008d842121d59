//! Client library for tailing task output.
//!
//! Provides a gRPC client for the monitor's `ReadOutput` call and a
//! [`LogTail`] that polls a task's output from a moving offset.

pub mod error;
pub mod grpc;
pub mod tail;

pub use error::ClientError;
pub use grpc::LogClient;
pub use tail::{LogTail, PollBackoff, DEFAULT_CHUNK_SIZE};

//! Error types for the log client.

use thiserror::Error;

/// Errors that can occur when reading task output.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to establish connection.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The monitor has no output registered for the task.
    #[error("unknown task: {0}")]
    UnknownTask(String),

    /// gRPC error from the server.
    #[error("gRPC error: {0}")]
    Grpc(#[from] tonic::Status),

    /// Failed to write the output locally.
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Whether a later poll may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Grpc(status) => status.code() == tonic::Code::Unavailable,
            _ => false,
        }
    }
}

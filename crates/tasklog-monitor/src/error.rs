//! Server bootstrap errors.

use thiserror::Error;

/// Errors that stop the monitor from serving.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Failed to read a TLS file.
    #[error("Failed to read {what} from '{path}': {source}")]
    ReadFile {
        what: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to bind the listener.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// gRPC transport error.
    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

//! gRPC bindings and converters for the tasklog Monitor service.
//!
//! This crate contains:
//! - Protobuf message types for `ReadOutput`
//! - Generated gRPC service stubs (client and server)
//! - Converters between proto types and domain types

pub mod convert;

/// Default cap on the bytes returned by a single `ReadOutput` call (16 MiB).
pub const DEFAULT_MAX_READ_SIZE: usize = 16 * 1024 * 1024;

/// Largest encoded `ReadOutputReply` a client accepts by default: a full
/// default-sized read plus room for the message framing.
pub const DEFAULT_MAX_REPLY_SIZE: usize = DEFAULT_MAX_READ_SIZE + 1024;

/// Protobuf types and generated services.
pub mod pb {
    /// Request for a byte range of a task's output.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ReadOutputRequest {
        #[prost(string, tag = "1")]
        pub task_id: ::prost::alloc::string::String,
        #[prost(int32, tag = "2")]
        pub size: i32,
        #[prost(int64, tag = "3")]
        pub offset: i64,
    }

    /// Bytes read, or the end-of-file signal.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ReadOutputReply {
        #[prost(bytes = "vec", tag = "1")]
        pub data: ::prost::alloc::vec::Vec<u8>,
        #[prost(bool, tag = "2")]
        pub end_of_file: bool,
    }

    // Generated by build.rs; the file name is "<package>.<service>.rs" and
    // the package is empty.
    include!(concat!(env!("OUT_DIR"), "/.Monitor.rs"));
}

// Re-export commonly used types
pub use pb::monitor_client::MonitorClient;
pub use pb::monitor_server::{Monitor, MonitorServer};

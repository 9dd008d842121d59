//! tasklog Monitor Library
//!
//! This crate runs next to executing tasks and lets remote callers tail
//! their output: the task launcher registers each task's output file with a
//! [`LogMonitor`], and callers read byte ranges of it over gRPC.

pub mod config;
pub mod error;
pub mod server;
pub mod service;

pub use config::Config;
pub use error::MonitorError;
pub use server::LogMonitor;
pub use service::MonitorServiceImpl;

//! Monitor configuration.

use tasklog_core::TaskLogEntry;
use tracing::Level;

pub use tasklog_proto::DEFAULT_MAX_READ_SIZE;

/// Monitor configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// gRPC server bind address.
    pub bind_addr: String,

    /// PEM certificate served to clients. TLS is enabled only when both the
    /// certificate and the key are set.
    pub tls_cert_path: Option<String>,

    /// PEM private key matching `tls_cert_path`.
    pub tls_key_path: Option<String>,

    /// Upper bound on the size of a single read. Clients reject replies
    /// above their decoding limit, so raising this past
    /// `DEFAULT_MAX_READ_SIZE` needs `LogClient::with_max_reply_size` too.
    pub max_read_size: usize,

    /// Maximum level of log events to emit.
    pub log_level: Level,

    /// Tasks registered before the server starts accepting requests.
    pub watches: Vec<TaskLogEntry>,
}

impl Config {
    /// Whether the server should terminate TLS.
    pub fn tls_enabled(&self) -> bool {
        self.tls_cert_path.is_some() && self.tls_key_path.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "[::1]:50052".to_string(),
            tls_cert_path: None,
            tls_key_path: None,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            log_level: Level::INFO,
            watches: Vec::new(),
        }
    }
}

/// Parse a `TASK_ID=PATH` pair as given to `--watch`.
///
/// Splits on the first `=`, so paths may contain `=` but task ids may not.
pub fn parse_watch(s: &str) -> Result<TaskLogEntry, String> {
    let (task_id, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TASK_ID=PATH, got '{s}'"))?;

    if task_id.is_empty() {
        return Err("task id cannot be empty".to_string());
    }
    if path.is_empty() {
        return Err(format!("path for task '{task_id}' cannot be empty"));
    }

    Ok(TaskLogEntry::new(task_id, path))
}

/// Log filter directives: `RUST_LOG` when it is set and non-empty, otherwise
/// the configured level.
pub fn log_directives(level: Level, rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => level.to_string().to_ascii_lowercase(),
    }
}

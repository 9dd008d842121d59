//! Embeddable log monitor: the registry plus the gRPC server that reads it.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Identity, Server, ServerTlsConfig};
use tracing::info;

use tasklog_core::{TaskId, TaskLogRegistry};

use crate::config::Config;
use crate::error::MonitorError;
use crate::service::MonitorServiceImpl;

/// Serves the output of locally running tasks to remote callers.
///
/// The task launcher calls [`LogMonitor::start_watching_log`] as each task
/// starts; remote callers read the registered files through `ReadOutput`.
pub struct LogMonitor {
    registry: Arc<TaskLogRegistry>,
    config: Config,
}

impl LogMonitor {
    /// Create a monitor and register the tasks listed in `config.watches`.
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(TaskLogRegistry::new());
        for entry in &config.watches {
            registry.register_entry(entry.clone());
        }
        Self { registry, config }
    }

    /// Create a monitor around an existing registry.
    pub fn with_registry(config: Config, registry: Arc<TaskLogRegistry>) -> Self {
        for entry in &config.watches {
            registry.register_entry(entry.clone());
        }
        Self { registry, config }
    }

    /// Shared handle to the registry, for launchers running elsewhere.
    pub fn registry(&self) -> Arc<TaskLogRegistry> {
        self.registry.clone()
    }

    /// Make `stdout_path` readable as the output of `task_id`.
    pub fn start_watching_log(&self, task_id: impl Into<TaskId>, stdout_path: impl Into<PathBuf>) {
        self.registry.register(task_id, stdout_path);
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, MonitorError> {
        TcpListener::bind(&self.config.bind_addr)
            .await
            .map_err(|source| MonitorError::Bind {
                addr: self.config.bind_addr.clone(),
                source,
            })
    }

    /// Serve on `listener` until the server fails.
    pub async fn serve(self, listener: TcpListener) -> Result<(), MonitorError> {
        self.serve_with_shutdown(listener, std::future::pending())
            .await
    }

    /// Serve on `listener` until `signal` completes.
    pub async fn serve_with_shutdown<F>(
        self,
        listener: TcpListener,
        signal: F,
    ) -> Result<(), MonitorError>
    where
        F: Future<Output = ()> + Send,
    {
        let local_addr = listener.local_addr().ok();
        let service =
            MonitorServiceImpl::new(self.registry.clone(), self.config.max_read_size).into_server();

        let mut builder = Server::builder();
        if let Some(tls_config) = self.tls_config()? {
            builder = builder.tls_config(tls_config)?;
        }

        info!(
            addr = ?local_addr,
            tls = self.config.tls_enabled(),
            tasks = self.registry.len(),
            "Monitor listening"
        );

        builder
            .add_service(service)
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), signal)
            .await?;

        info!("Monitor stopped");
        Ok(())
    }

    fn tls_config(&self) -> Result<Option<ServerTlsConfig>, MonitorError> {
        let (Some(cert_path), Some(key_path)) =
            (&self.config.tls_cert_path, &self.config.tls_key_path)
        else {
            return Ok(None);
        };

        let cert = std::fs::read(cert_path).map_err(|source| MonitorError::ReadFile {
            what: "TLS certificate",
            path: cert_path.clone(),
            source,
        })?;
        let key = std::fs::read(key_path).map_err(|source| MonitorError::ReadFile {
            what: "TLS key",
            path: key_path.clone(),
            source,
        })?;

        Ok(Some(
            ServerTlsConfig::new().identity(Identity::from_pem(cert, key)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tasklog_core::TaskLogEntry;

    #[test]
    fn test_new_registers_configured_watches() {
        let config = Config {
            watches: vec![
                TaskLogEntry::new("a", "/logs/a.txt"),
                TaskLogEntry::new("b", "/logs/b.txt"),
            ],
            ..Config::default()
        };
        let monitor = LogMonitor::new(config);

        let registry = monitor.registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("b").as_deref(), Some(Path::new("/logs/b.txt")));
    }

    #[test]
    fn test_start_watching_log() {
        let monitor = LogMonitor::new(Config::default());
        monitor.start_watching_log("t1", "/tmp/out.log");
        assert_eq!(
            monitor.registry().resolve("t1").as_deref(),
            Some(Path::new("/tmp/out.log"))
        );
    }

    #[tokio::test]
    async fn test_missing_tls_files_fail_before_serving() {
        let config = Config {
            bind_addr: "127.0.0.1:0".to_string(),
            tls_cert_path: Some("/nonexistent/server.crt".to_string()),
            tls_key_path: Some("/nonexistent/server.key".to_string()),
            ..Config::default()
        };
        let monitor = LogMonitor::new(config);
        let listener = monitor.bind().await.unwrap();

        let err = monitor.serve(listener).await.unwrap_err();
        assert!(matches!(err, MonitorError::ReadFile { what: "TLS certificate", .. }));
    }
}

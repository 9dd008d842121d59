//! tasklog Monitor Server

use clap::Parser;
use tasklog_core::TaskLogEntry;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tasklog_monitor::config::{log_directives, parse_watch, DEFAULT_MAX_READ_SIZE};
use tasklog_monitor::{Config, LogMonitor};

/// tasklog Monitor - serve task output to remote tailers
#[derive(Parser)]
#[command(name = "tasklog-monitor")]
#[command(about = "Serves byte ranges of task output files over gRPC", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "[::1]:50052")]
    bind: String,

    /// PEM certificate for TLS (requires --tls-key)
    #[arg(long, requires = "tls_key")]
    tls_cert: Option<String>,

    /// PEM private key for TLS (requires --tls-cert)
    #[arg(long, requires = "tls_cert")]
    tls_key: Option<String>,

    /// Maximum number of bytes returned by one read
    #[arg(long, default_value_t = DEFAULT_MAX_READ_SIZE)]
    max_read_size: usize,

    /// Register a task's output before serving, as TASK_ID=PATH (repeatable)
    #[arg(short, long = "watch", value_parser = parse_watch)]
    watches: Vec<TaskLogEntry>,

    /// Log verbosity (error, warn, info, debug, trace); RUST_LOG overrides it
    #[arg(long, default_value = "info")]
    log_level: Level,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            bind_addr: args.bind,
            tls_cert_path: args.tls_cert,
            tls_key_path: args.tls_key,
            max_read_size: args.max_read_size,
            log_level: args.log_level,
            watches: args.watches,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config: Config = Args::parse().into();

    // Initialize tracing
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::new(log_directives(config.log_level, rust_log.as_deref()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        bind_addr = %config.bind_addr,
        watches = config.watches.len(),
        max_read_size = config.max_read_size,
        "Starting tasklog monitor"
    );

    let monitor = LogMonitor::new(config);
    let listener = monitor.bind().await?;

    monitor
        .serve_with_shutdown(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

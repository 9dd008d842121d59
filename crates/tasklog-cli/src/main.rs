//! tasklog CLI - Read and tail task output from a monitor.

use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::io::AsyncWriteExt;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tasklog_client::{ClientError, LogClient, LogTail, PollBackoff, DEFAULT_CHUNK_SIZE};
use tasklog_core::RangeReadRequest;

/// tasklog CLI - Task output reader
#[derive(Parser)]
#[command(name = "tasklog")]
#[command(about = "Read task output from a tasklog monitor", long_about = None)]
struct Cli {
    /// Monitor address
    #[arg(short, long, default_value = "http://[::1]:50052")]
    addr: String,

    /// CA certificate (PEM) to verify the monitor with; enables TLS
    #[arg(long)]
    ca_cert: Option<String>,

    /// Server name expected in the monitor's certificate
    #[arg(long, requires = "ca_cert")]
    tls_domain: Option<String>,

    /// Log diagnostics to stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read one byte range of a task's output
    Read {
        /// Task ID
        task_id: String,

        /// Byte offset to start at
        #[arg(short, long, default_value_t = 0)]
        offset: u64,

        /// Maximum number of bytes to read
        #[arg(short, long, default_value_t = DEFAULT_CHUNK_SIZE)]
        size: usize,
    },

    /// Print a task's output until end of file
    Tail {
        /// Task ID
        task_id: String,

        /// Byte offset to start at
        #[arg(short, long, default_value_t = 0)]
        offset: u64,

        /// Keep polling for new output until interrupted
        #[arg(short, long)]
        follow: bool,

        /// Longest delay between polls when following (seconds)
        #[arg(long, default_value_t = 30)]
        max_poll_delay: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let ca_cert = match &cli.ca_cert {
        Some(path) => Some(
            std::fs::read(path)
                .map_err(|e| format!("Failed to read CA certificate from '{}': {}", path, e))?,
        ),
        None => None,
    };
    let client = LogClient::connect(&cli.addr, ca_cert.as_deref(), cli.tls_domain.as_deref()).await?;

    match cli.command {
        Commands::Read {
            task_id,
            offset,
            size,
        } => {
            read(client, task_id, offset, size).await?;
        }
        Commands::Tail {
            task_id,
            offset,
            follow,
            max_poll_delay,
        } => {
            tail(client, task_id, offset, follow, max_poll_delay).await?;
        }
    }

    Ok(())
}

async fn read(
    mut client: LogClient,
    task_id: String,
    offset: u64,
    size: usize,
) -> Result<(), ClientError> {
    let reply = client
        .read(&RangeReadRequest::new(task_id, offset, size))
        .await?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&reply.data).await?;
    stdout.flush().await?;

    if reply.end_of_file {
        eprintln!("(end of file at offset {})", offset);
    }

    Ok(())
}

async fn tail(
    client: LogClient,
    task_id: String,
    offset: u64,
    follow: bool,
    max_poll_delay: u64,
) -> Result<(), ClientError> {
    let mut tail = LogTail::new(client, task_id).with_offset(offset);
    let mut stdout = tokio::io::stdout();

    if follow {
        let backoff = PollBackoff::new(
            Duration::from_secs(1),
            Duration::from_secs(max_poll_delay.max(1)),
            1.5,
        );
        let stop = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        tail.follow(&mut stdout, backoff, stop).await?;
    } else {
        tail.poll(&mut stdout).await?;
    }

    Ok(())
}

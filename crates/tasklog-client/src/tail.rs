//! Polling a task's output from a moving offset.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use tasklog_core::{RangeReadRequest, TaskId};

use crate::error::ClientError;
use crate::grpc::LogClient;

/// Bytes requested per `ReadOutput` call.
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Delay between polls while following a task.
///
/// Starts at `initial`, grows by `factor` after every poll that produced no
/// new output, is capped at `max`, and resets as soon as output arrives.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    initial: Duration,
    max: Duration,
    factor: f64,
    current: Duration,
}

impl PollBackoff {
    /// Create a backoff.
    pub fn new(initial: Duration, max: Duration, factor: f64) -> Self {
        Self {
            initial,
            max,
            factor,
            current: initial,
        }
    }

    /// The delay to wait before the next poll.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Record the outcome of a poll and return the delay before the next one.
    pub fn next_delay(&mut self, made_progress: bool) -> Duration {
        self.current = if made_progress {
            self.initial
        } else {
            self.current.mul_f64(self.factor).min(self.max)
        };
        self.current
    }
}

impl Default for PollBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(30), 1.5)
    }
}

/// Tails one task's output.
pub struct LogTail {
    client: LogClient,
    task_id: TaskId,
    offset: u64,
    chunk_size: usize,
}

impl LogTail {
    /// Tail `task_id` from the start of its output.
    pub fn new(client: LogClient, task_id: impl Into<TaskId>) -> Self {
        Self {
            client,
            task_id: task_id.into(),
            offset: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Start at `offset` instead of the beginning.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Request `chunk_size` bytes per call.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Offset of the next byte to read.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Copy everything currently available to `out`, stopping at end-of-file.
    ///
    /// Returns the number of bytes written.
    pub async fn poll<W>(&mut self, out: &mut W) -> Result<u64, ClientError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut written = 0u64;
        loop {
            let request = RangeReadRequest::new(self.task_id.clone(), self.offset, self.chunk_size);
            let reply = self.client.read(&request).await?;

            if !reply.data.is_empty() {
                out.write_all(&reply.data).await?;
                let n = reply.data.len() as u64;
                self.offset += n;
                written += n;
            }

            if reply.end_of_file || reply.data.is_empty() {
                break;
            }
        }
        out.flush().await?;

        debug!(task_id = %self.task_id, offset = self.offset, written, "Poll complete");
        Ok(written)
    }

    /// Poll repeatedly until `stop` completes.
    ///
    /// Stops with an error on an unknown task. A monitor that cannot open the
    /// file yet is retried on the next poll.
    pub async fn follow<W, F>(
        &mut self,
        out: &mut W,
        mut backoff: PollBackoff,
        stop: F,
    ) -> Result<(), ClientError>
    where
        W: AsyncWrite + Unpin,
        F: Future<Output = ()>,
    {
        tokio::pin!(stop);

        loop {
            let made_progress = match self.poll(out).await {
                Ok(written) => written > 0,
                Err(e) if e.is_retryable() => {
                    warn!(task_id = %self.task_id, error = %e, "Output not readable yet, retrying");
                    false
                }
                Err(e) => return Err(e),
            };

            let delay = backoff.next_delay(made_progress);
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = &mut stop => return Ok(()),
            }
        }
    }
}

//! Positioned reads of registered task output.

use std::fs::File;
use std::io;
use std::sync::Arc;

use tracing::debug;

use crate::{CoreError, RangeReadReply, RangeReadRequest, TaskLogRegistry};

/// Serves byte ranges of the files recorded in a [`TaskLogRegistry`].
///
/// Every read opens the file afresh and reads at an absolute position, so
/// concurrent reads of the same file never share a cursor and a file that
/// only appears after registration is picked up by the next read.
#[derive(Debug, Clone)]
pub struct RangeReader {
    registry: Arc<TaskLogRegistry>,
}

impl RangeReader {
    /// Create a reader backed by `registry`.
    pub fn new(registry: Arc<TaskLogRegistry>) -> Self {
        Self { registry }
    }

    /// Read up to `request.size` bytes of the task's output at `request.offset`.
    ///
    /// Returns [`CoreError::UnknownTask`] for unregistered tasks and
    /// [`CoreError::Open`] when the file cannot be opened. Once the file is
    /// open, any read failure is reported as end-of-file rather than as an
    /// error: callers poll a file that may still be growing and retry later,
    /// so reading at or past the current end and a genuine I/O error look the
    /// same from here.
    pub fn read_range(&self, request: &RangeReadRequest) -> Result<RangeReadReply, CoreError> {
        let task_id = request.task_id.as_str();
        let path = self
            .registry
            .resolve(task_id)
            .ok_or_else(|| CoreError::UnknownTask(task_id.to_string()))?;

        let file = File::open(&path).map_err(|source| CoreError::Open {
            task_id: task_id.to_string(),
            path: path.clone(),
            source,
        })?;

        // Never allocate more than the file currently holds past `offset`.
        // A file that grows in the meantime yields a short read, which the
        // next poll picks up.
        let available = file
            .metadata()
            .map(|m| m.len().saturating_sub(request.offset))
            .unwrap_or(u64::MAX);
        let capacity = usize::try_from(available)
            .unwrap_or(usize::MAX)
            .min(request.size);

        let mut buffer = vec![0u8; capacity];
        let reply = match read_full_at(&file, &mut buffer, request.offset) {
            Ok(0) if request.size > 0 => RangeReadReply::end_of_file(),
            Ok(n) => {
                buffer.truncate(n);
                RangeReadReply::data(buffer)
            }
            Err(e) => {
                debug!(
                    task_id = %task_id,
                    offset = request.offset,
                    error = %e,
                    "Read failed, reporting end of file"
                );
                RangeReadReply::end_of_file()
            }
        };

        Ok(reply)
    }
}

/// Fill `buf` from `offset` until it is full or the file ends.
///
/// An error after some bytes were read keeps those bytes.
fn read_full_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match read_at(file, &mut buf[filled..], offset.saturating_add(filled as u64)) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) if filled > 0 => break,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(unix)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::unix::fs::FileExt;
    file.read_at(buf, offset)
}

// seek_read moves the handle's cursor, but the handle is private to one call.
#[cfg(windows)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::windows::fs::FileExt;
    file.seek_read(buf, offset)
}

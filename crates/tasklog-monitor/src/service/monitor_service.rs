//! Monitor service implementation: `ReadOutput` over the task log registry.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{debug, warn};

use tasklog_core::{RangeReadRequest, RangeReader, TaskLogRegistry};
use tasklog_proto::convert::status_from_core_error;
use tasklog_proto::pb::{ReadOutputReply, ReadOutputRequest};
use tasklog_proto::{Monitor, MonitorServer};

/// Monitor service implementation.
pub struct MonitorServiceImpl {
    reader: RangeReader,
    max_read_size: usize,
}

impl MonitorServiceImpl {
    /// Create a new MonitorServiceImpl serving tasks from `registry`.
    pub fn new(registry: Arc<TaskLogRegistry>, max_read_size: usize) -> Self {
        Self {
            reader: RangeReader::new(registry),
            max_read_size,
        }
    }

    /// Convert into a tonic server.
    pub fn into_server(self) -> MonitorServer<Self> {
        MonitorServer::new(self)
    }
}

#[tonic::async_trait]
impl Monitor for MonitorServiceImpl {
    async fn read_output(
        &self,
        request: Request<ReadOutputRequest>,
    ) -> Result<Response<ReadOutputReply>, Status> {
        let mut req = RangeReadRequest::try_from(request.into_inner())?;
        req.size = req.size.min(self.max_read_size);

        let task_id = req.task_id.clone();
        let offset = req.offset;
        let reader = self.reader.clone();

        // The read runs to completion even if the caller goes away; only the
        // reply is dropped.
        let result = tokio::task::spawn_blocking(move || reader.read_range(&req))
            .await
            .map_err(|e| Status::internal(format!("Read task failed: {e}")))?;

        match result {
            Ok(reply) => {
                debug!(
                    task_id = %task_id,
                    offset,
                    bytes = reply.data.len(),
                    end_of_file = reply.end_of_file,
                    "ReadOutput served"
                );
                Ok(Response::new(reply.into()))
            }
            Err(e) => {
                warn!(task_id = %task_id, offset, error = %e, "ReadOutput failed");
                Err(status_from_core_error(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tonic::Code;

    fn request(task_id: &str, offset: i64, size: i32) -> Request<ReadOutputRequest> {
        Request::new(ReadOutputRequest {
            task_id: task_id.to_string(),
            size,
            offset,
        })
    }

    fn service_with_hello_world(max_read_size: usize) -> (TempDir, MonitorServiceImpl) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.log");
        std::fs::write(&path, b"hello world").unwrap();

        let registry = Arc::new(TaskLogRegistry::new());
        registry.register("t1", path);
        (dir, MonitorServiceImpl::new(registry, max_read_size))
    }

    #[tokio::test]
    async fn test_read_output_scenario() {
        let (_dir, service) = service_with_hello_world(1024);

        let reply = service.read_output(request("t1", 0, 5)).await.unwrap().into_inner();
        assert_eq!(reply.data, b"hello");
        assert!(!reply.end_of_file);

        let reply = service.read_output(request("t1", 6, 20)).await.unwrap().into_inner();
        assert_eq!(reply.data, b"world");
        assert!(!reply.end_of_file);

        let reply = service.read_output(request("t1", 11, 5)).await.unwrap().into_inner();
        assert!(reply.data.is_empty());
        assert!(reply.end_of_file);

        let status = service.read_output(request("t2", 0, 5)).await.unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_read_output_clamps_size() {
        let (_dir, service) = service_with_hello_world(4);

        let reply = service.read_output(request("t1", 0, 100)).await.unwrap().into_inner();
        assert_eq!(reply.data, b"hell");
        assert!(!reply.end_of_file);
    }

    #[tokio::test]
    async fn test_read_output_rejects_negative_offset() {
        let (_dir, service) = service_with_hello_world(1024);
        let status = service.read_output(request("t1", -1, 5)).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_read_output_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let registry = Arc::new(TaskLogRegistry::new());
        registry.register("t1", dir.path().join("not-yet.log"));
        let service = MonitorServiceImpl::new(registry, 1024);

        let status = service.read_output(request("t1", 0, 5)).await.unwrap_err();
        assert_eq!(status.code(), Code::Unavailable);
    }
}

//! Converters between proto types and domain types.

use tasklog_core::{CoreError, RangeReadReply, RangeReadRequest};
use tonic::Status;

use crate::pb;

// ============================================================================
// ReadOutputRequest conversions
// ============================================================================

impl TryFrom<pb::ReadOutputRequest> for RangeReadRequest {
    type Error = Status;

    /// Rejects negative offsets and sizes.
    fn try_from(req: pb::ReadOutputRequest) -> Result<Self, Self::Error> {
        let offset = u64::try_from(req.offset).map_err(|_| {
            Status::invalid_argument(format!("offset must be non-negative, got {}", req.offset))
        })?;
        let size = usize::try_from(req.size).map_err(|_| {
            Status::invalid_argument(format!("size must be non-negative, got {}", req.size))
        })?;

        Ok(RangeReadRequest::new(req.task_id, offset, size))
    }
}

impl From<&RangeReadRequest> for pb::ReadOutputRequest {
    /// Values beyond the wire range saturate.
    fn from(req: &RangeReadRequest) -> Self {
        Self {
            task_id: req.task_id.as_str().to_string(),
            size: i32::try_from(req.size).unwrap_or(i32::MAX),
            offset: i64::try_from(req.offset).unwrap_or(i64::MAX),
        }
    }
}

// ============================================================================
// ReadOutputReply conversions
// ============================================================================

impl From<RangeReadReply> for pb::ReadOutputReply {
    fn from(reply: RangeReadReply) -> Self {
        Self {
            data: reply.data,
            end_of_file: reply.end_of_file,
        }
    }
}

impl From<pb::ReadOutputReply> for RangeReadReply {
    fn from(reply: pb::ReadOutputReply) -> Self {
        Self {
            data: reply.data,
            end_of_file: reply.end_of_file,
        }
    }
}

// ============================================================================
// Error conversions
// ============================================================================

/// Map a core error onto the gRPC status the caller sees.
///
/// Unknown tasks are `NOT_FOUND` and should stop a poller. Open failures are
/// `UNAVAILABLE` (or `PERMISSION_DENIED`) since the file may still appear.
pub fn status_from_core_error(err: CoreError) -> Status {
    match &err {
        CoreError::UnknownTask(_) => Status::not_found(err.to_string()),
        CoreError::Open { source, .. }
            if source.kind() == std::io::ErrorKind::PermissionDenied =>
        {
            Status::permission_denied(err.to_string())
        }
        CoreError::Open { .. } => Status::unavailable(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tonic::Code;

    #[test]
    fn test_request_from_proto() {
        let proto = pb::ReadOutputRequest {
            task_id: "t1".to_string(),
            size: 100_000,
            offset: 42,
        };
        let req = RangeReadRequest::try_from(proto).unwrap();
        assert_eq!(req, RangeReadRequest::new("t1", 42, 100_000));
    }

    #[test]
    fn test_request_rejects_negative_values() {
        let negative_offset = pb::ReadOutputRequest {
            task_id: "t1".to_string(),
            size: 10,
            offset: -1,
        };
        let status = RangeReadRequest::try_from(negative_offset).unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);

        let negative_size = pb::ReadOutputRequest {
            task_id: "t1".to_string(),
            size: -5,
            offset: 0,
        };
        let status = RangeReadRequest::try_from(negative_size).unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[test]
    fn test_request_to_proto_saturates() {
        let req = RangeReadRequest::new("t1", u64::MAX, usize::MAX);
        let proto: pb::ReadOutputRequest = (&req).into();
        assert_eq!(proto.offset, i64::MAX);
        assert_eq!(proto.size, i32::MAX);
    }

    #[test]
    fn test_reply_conversion() {
        let proto: pb::ReadOutputReply = RangeReadReply::data(b"hello".to_vec()).into();
        assert_eq!(proto.data, b"hello");
        assert!(!proto.end_of_file);

        let back: RangeReadReply = pb::ReadOutputReply {
            data: Vec::new(),
            end_of_file: true,
        }
        .into();
        assert_eq!(back, RangeReadReply::end_of_file());
    }

    #[test]
    fn test_status_from_core_error() {
        let status = status_from_core_error(CoreError::UnknownTask("t2".to_string()));
        assert_eq!(status.code(), Code::NotFound);
        assert!(status.message().contains("t2"));

        let status = status_from_core_error(CoreError::Open {
            task_id: "t1".to_string(),
            path: "/nope".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
        assert_eq!(status.code(), Code::Unavailable);

        let status = status_from_core_error(CoreError::Open {
            task_id: "t1".to_string(),
            path: "/root/secret".into(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        });
        assert_eq!(status.code(), Code::PermissionDenied);
    }
}

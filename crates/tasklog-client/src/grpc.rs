//! gRPC client for the Monitor service.

use tonic::transport::{Certificate, Channel, ClientTlsConfig};
use tonic::Code;
use tracing::info;

use tasklog_core::{RangeReadReply, RangeReadRequest};
use tasklog_proto::pb::ReadOutputRequest;
use tasklog_proto::{MonitorClient, DEFAULT_MAX_REPLY_SIZE};

use crate::error::ClientError;

/// Client for one monitor.
#[derive(Clone)]
pub struct LogClient {
    inner: MonitorClient<Channel>,
}

impl LogClient {
    /// Connect to a monitor.
    ///
    /// # Arguments
    /// * `endpoint` - The gRPC endpoint (e.g., "http://[::1]:50052")
    /// * `ca_cert` - Optional CA certificate; enables TLS when set
    /// * `domain_name` - Name to verify the server certificate against
    pub async fn connect(
        endpoint: &str,
        ca_cert: Option<&[u8]>,
        domain_name: Option<&str>,
    ) -> Result<Self, ClientError> {
        info!(endpoint = %endpoint, tls = ca_cert.is_some(), "Connecting to monitor");

        let mut builder = Channel::from_shared(endpoint.to_string())
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        if let Some(ca) = ca_cert {
            let mut tls = ClientTlsConfig::new().ca_certificate(Certificate::from_pem(ca));
            if let Some(domain) = domain_name {
                tls = tls.domain_name(domain);
            }
            builder = builder
                .tls_config(tls)
                .map_err(|e| ClientError::Connection(e.to_string()))?;
        }

        let channel = builder
            .connect()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(Self::new(channel))
    }

    /// Wrap an existing channel.
    ///
    /// Accepts replies up to [`DEFAULT_MAX_REPLY_SIZE`], enough for a full
    /// read at the monitor's default size cap.
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: MonitorClient::new(channel).max_decoding_message_size(DEFAULT_MAX_REPLY_SIZE),
        }
    }

    /// Accept encoded replies up to `limit` bytes, for monitors configured
    /// with a larger `max_read_size`.
    pub fn with_max_reply_size(mut self, limit: usize) -> Self {
        self.inner = self.inner.max_decoding_message_size(limit);
        self
    }

    /// Read one range of a task's output.
    pub async fn read(&mut self, request: &RangeReadRequest) -> Result<RangeReadReply, ClientError> {
        let proto: ReadOutputRequest = request.into();
        match self.inner.read_output(proto).await {
            Ok(response) => Ok(response.into_inner().into()),
            Err(status) if status.code() == Code::NotFound => Err(ClientError::UnknownTask(
                request.task_id.as_str().to_string(),
            )),
            Err(status) => Err(status.into()),
        }
    }
}

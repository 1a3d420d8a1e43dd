//! Relay service for forwarding uploads to the processing worker.
//!
//! The service owns the worker client and performs the single outbound call
//! per request. It holds no state between requests: no queue, no cache, no
//! job history.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::RelayError;
use crate::worker::{UploadRequest, WorkerClient};

/// Service that relays one uploaded file to the worker and returns the
/// worker's JSON reply verbatim.
///
/// # Type Parameters
///
/// * `W` - The worker client type (HTTP in production, mock in tests)
///
/// # Example
///
/// ```ignore
/// use transcript_relay::relay::RelayService;
/// use transcript_relay::worker::{HttpWorkerClient, UploadRequest};
///
/// let service = RelayService::new(HttpWorkerClient::new(url, secret));
/// let reply = service.process(upload).await?;
/// ```
pub struct RelayService<W: WorkerClient> {
    client: Arc<W>,
}

impl<W: WorkerClient> RelayService<W> {
    /// Create a new relay service over the given worker client.
    pub fn new(client: W) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Relay an upload to the worker.
    ///
    /// Awaits the single outbound call once; there is no retry and no
    /// timeout override. The reply is the worker's body, unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Worker`] when the worker is unreachable,
    /// answers non-2xx, or answers with an unparseable body.
    pub async fn process(&self, upload: UploadRequest) -> Result<serde_json::Value, RelayError> {
        info!(
            file_name = %upload.file_name,
            content_type = upload.content_type.as_deref().unwrap_or("unknown"),
            size = upload.size(),
            "Relaying upload to worker"
        );

        let reply = self.client.process(&upload).await?;

        debug!(file_name = %upload.file_name, "Worker reply forwarded");
        Ok(reply)
    }
}

impl<W: WorkerClient> Clone for RelayService<W> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

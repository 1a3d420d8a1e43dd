//! Worker client trait and the upload request it consumes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::WorkerError;

// =============================================================================
// Upload Request
// =============================================================================

/// A single uploaded file, read fully from the inbound request.
///
/// This is the only data that crosses the relay: one file plus its declared
/// name and media type. It is created when the inbound multipart body is
/// read, consumed once by the outbound worker call, and discarded.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// File name as declared by the client (e.g., "notes.vtt")
    pub file_name: String,

    /// Media type as declared by the client, if any
    pub content_type: Option<String>,

    /// Raw file content
    pub data: Bytes,
}

impl UploadRequest {
    /// Create a new upload request.
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            data: data.into(),
        }
    }

    /// Size of the file content in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

// =============================================================================
// Worker Client Trait
// =============================================================================

/// Transport seam for the external processing worker.
///
/// Implementations send the uploaded file to the worker and return the
/// worker's reply parsed as JSON, without inspecting or reshaping it. The
/// reply is forwarded to the browser verbatim, so this trait deliberately
/// returns a raw [`serde_json::Value`] rather than a typed structure.
#[async_trait]
pub trait WorkerClient: Send + Sync {
    /// Relay one file to the worker and return its parsed JSON reply.
    ///
    /// Exactly one outbound call is made per invocation; there is no retry.
    ///
    /// # Errors
    ///
    /// - [`WorkerError::Unreachable`] when no response arrives at all
    /// - [`WorkerError::UpstreamStatus`] when the worker answers non-2xx
    /// - [`WorkerError::MalformedBody`] when a 2xx body is not valid JSON
    async fn process(&self, upload: &UploadRequest) -> Result<serde_json::Value, WorkerError>;
}

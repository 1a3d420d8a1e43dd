//! HTTP implementation of the worker client.
//!
//! Sends the uploaded file to the configured worker URL as a freshly built
//! multipart body, carrying the shared secret in the `x-worker-secret`
//! header. The secret never reaches the browser; it exists only on this
//! outbound leg.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::error::WorkerError;

use super::{UploadRequest, WorkerClient};

/// Header carrying the shared secret on the outbound worker call.
pub const WORKER_SECRET_HEADER: &str = "x-worker-secret";

/// Worker client that POSTs uploads to an HTTP endpoint.
///
/// The single call is awaited once, with the client's default transport
/// settings: no retry and no timeout override.
///
/// # Example
///
/// ```ignore
/// use transcript_relay::worker::{HttpWorkerClient, WorkerClient, UploadRequest};
///
/// let client = HttpWorkerClient::new("https://worker.internal/webhook", "shared-secret");
/// let upload = UploadRequest::new("notes.vtt", None, &b"WEBVTT"[..]);
/// let reply = client.process(&upload).await?;
/// ```
#[derive(Clone)]
pub struct HttpWorkerClient {
    http: reqwest::Client,
    worker_url: String,
    worker_secret: String,
}

impl HttpWorkerClient {
    /// Create a new client for the given worker URL and shared secret.
    pub fn new(worker_url: impl Into<String>, worker_secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            worker_url: worker_url.into(),
            worker_secret: worker_secret.into(),
        }
    }

    /// The configured worker URL.
    pub fn worker_url(&self) -> &str {
        &self.worker_url
    }

    /// Build the outbound multipart part for an upload.
    ///
    /// A declared media type that is not a valid MIME string is dropped
    /// rather than failing the relay; the worker sees the part without one.
    fn build_part(upload: &UploadRequest) -> Part {
        let part = Part::bytes(upload.data.to_vec()).file_name(upload.file_name.clone());
        match upload.content_type.as_deref() {
            Some(content_type) => part.mime_str(content_type).unwrap_or_else(|_| {
                Part::bytes(upload.data.to_vec()).file_name(upload.file_name.clone())
            }),
            None => part,
        }
    }
}

#[async_trait]
impl WorkerClient for HttpWorkerClient {
    async fn process(&self, upload: &UploadRequest) -> Result<serde_json::Value, WorkerError> {
        let form = Form::new().part("file", Self::build_part(upload));

        let response = self
            .http
            .post(&self.worker_url)
            .header(WORKER_SECRET_HEADER, &self.worker_secret)
            .multipart(form)
            .send()
            .await
            .map_err(|e| WorkerError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| WorkerError::Unreachable(e.to_string()))?;

        // The upstream body is parsed opportunistically: on a non-success
        // status it becomes diagnostic detail, on success it is the reply.
        let parsed: Option<serde_json::Value> = serde_json::from_slice(&body).ok();

        debug!(
            status = status.as_u16(),
            body_len = body.len(),
            parseable = parsed.is_some(),
            "Worker responded"
        );

        if !status.is_success() {
            return Err(WorkerError::UpstreamStatus {
                status: status.as_u16(),
                details: parsed,
            });
        }

        parsed.ok_or(WorkerError::MalformedBody {
            status: status.as_u16(),
        })
    }
}

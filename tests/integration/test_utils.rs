//! Test utilities for integration tests.
//!
//! This module provides mock implementations of the external collaborators
//! and helpers for building multipart requests against the router.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use http_body_util::BodyExt;
use tokio::sync::RwLock;

use transcript_relay::error::{IdentityError, WorkerError};
use transcript_relay::identity::{Credentials, IdentityProvider, Session, UserInfo};
use transcript_relay::relay::RelayService;
use transcript_relay::server::{create_router, AppState, RouterConfig};
use transcript_relay::worker::{UploadRequest, WorkerClient};

// =============================================================================
// Mock Worker Client with Request Tracking
// =============================================================================

/// A recorded upload seen by the mock worker.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: usize,
}

/// A mock worker client that returns a canned reply and tracks all calls.
pub struct MockWorkerClient {
    reply: Result<serde_json::Value, WorkerError>,
    call_count: Arc<AtomicUsize>,
    uploads: Arc<RwLock<Vec<RecordedUpload>>>,
}

impl MockWorkerClient {
    /// Worker that answers 2xx with the given JSON body.
    pub fn replying(reply: serde_json::Value) -> Self {
        Self {
            reply: Ok(reply),
            call_count: Arc::new(AtomicUsize::new(0)),
            uploads: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Worker whose call fails with the given error.
    pub fn failing(err: WorkerError) -> Self {
        Self {
            reply: Err(err),
            call_count: Arc::new(AtomicUsize::new(0)),
            uploads: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub async fn recorded_uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.read().await.clone()
    }
}

impl Clone for MockWorkerClient {
    fn clone(&self) -> Self {
        Self {
            reply: self.reply.clone(),
            call_count: Arc::clone(&self.call_count),
            uploads: Arc::clone(&self.uploads),
        }
    }
}

#[async_trait]
impl WorkerClient for MockWorkerClient {
    async fn process(&self, upload: &UploadRequest) -> Result<serde_json::Value, WorkerError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.uploads.write().await.push(RecordedUpload {
            file_name: upload.file_name.clone(),
            content_type: upload.content_type.clone(),
            size: upload.size(),
        });
        self.reply.clone()
    }
}

// =============================================================================
// Mock Identity Provider
// =============================================================================

/// A mock identity provider with a fixed user table.
///
/// Sign-in issues `token-<email>` tokens; `current_user` resolves them back.
pub struct MockIdentityProvider {
    users: HashMap<String, String>,
    fail_with: Option<IdentityError>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            fail_with: None,
        }
    }

    /// Register a known user.
    pub fn with_user(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(email.into(), password.into());
        self
    }

    /// Make every operation fail with the given error.
    pub fn failing_with(err: IdentityError) -> Self {
        Self {
            users: HashMap::new(),
            fail_with: Some(err),
        }
    }

    /// The token this mock issues for an email.
    pub fn token_for(email: &str) -> String {
        format!("token-{}", email)
    }

    fn check_override(&self) -> Result<(), IdentityError> {
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_up(&self, credentials: &Credentials) -> Result<(), IdentityError> {
        self.check_override()?;
        if self.users.contains_key(&credentials.email) {
            return Err(IdentityError::Rejected {
                status: 422,
                message: "User already registered".to_string(),
            });
        }
        Ok(())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, IdentityError> {
        self.check_override()?;
        match self.users.get(&credentials.email) {
            Some(password) if *password == credentials.password => Ok(Session {
                access_token: Self::token_for(&credentials.email),
                email: Some(credentials.email.clone()),
            }),
            _ => Err(IdentityError::Rejected {
                status: 400,
                message: "Invalid login credentials".to_string(),
            }),
        }
    }

    async fn current_user(&self, access_token: &str) -> Result<UserInfo, IdentityError> {
        self.check_override()?;
        let email = access_token.strip_prefix("token-").filter(|email| {
            self.users.contains_key(*email)
        });
        match email {
            Some(email) => Ok(UserInfo {
                user_id: format!("user-{}", email),
                email: Some(email.to_string()),
            }),
            None => Err(IdentityError::Rejected {
                status: 401,
                message: "invalid JWT".to_string(),
            }),
        }
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), IdentityError> {
        self.check_override()?;
        Ok(())
    }
}

// =============================================================================
// Router Helpers
// =============================================================================

/// Build a router over the given mocks with tracing disabled.
pub fn test_router(
    worker: Option<MockWorkerClient>,
    identity: Option<MockIdentityProvider>,
) -> Router {
    let state = AppState::new(worker.map(RelayService::new), identity);
    create_router(state, RouterConfig::new().with_tracing(false))
}

/// Build a router with a custom router configuration.
pub fn test_router_with_config(
    worker: Option<MockWorkerClient>,
    identity: Option<MockIdentityProvider>,
    config: RouterConfig,
) -> Router {
    let state = AppState::new(worker.map(RelayService::new), identity);
    create_router(state, config)
}

// =============================================================================
// Request Builders
// =============================================================================

/// Boundary used by the multipart request builders.
pub const TEST_BOUNDARY: &str = "----transcript-relay-test-boundary";

/// One part of a multipart body: (field name, file name, content type, data).
pub type MultipartPart<'a> = (&'a str, Option<&'a str>, Option<&'a str>, &'a [u8]);

/// Build a multipart body from the given parts.
pub fn multipart_body(parts: &[MultipartPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content_type, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", TEST_BOUNDARY).as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    name, file_name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", name).as_bytes(),
            ),
        }
        if let Some(content_type) = content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", TEST_BOUNDARY).as_bytes());
    body
}

/// Build a multipart body with a single file field.
pub fn file_upload_body(
    field_name: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Vec<u8> {
    multipart_body(&[(field_name, Some(file_name), Some(content_type), data)])
}

/// Build a multipart POST request.
pub fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", TEST_BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Build a JSON POST request.
pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

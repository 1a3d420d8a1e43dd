//! HTTP request handlers for the transcript-relay API and pages.
//!
//! # Endpoints
//!
//! - `POST /api/process` - Relay an uploaded file to the processing worker
//! - `POST /api/auth/signup` - Register with the identity provider
//! - `POST /api/auth/signin` - Exchange credentials for a session
//! - `GET /api/auth/user` - Resolve the current session's user
//! - `POST /api/auth/signout` - Revoke the session (best effort)
//! - `GET /health` - Health check endpoint
//! - `GET /`, `GET /auth`, `GET /process` - HTML pages

use std::sync::Arc;

use axum::{
    extract::multipart::{Multipart, MultipartError, MultipartRejection},
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{IdentityError, RelayError};
use crate::identity::{Credentials, IdentityProvider};
use crate::relay::RelayService;
use crate::worker::{UploadRequest, WorkerClient};

use super::pages;

/// Message shown to the user after a successful sign-up. The provider sends
/// the confirmation email itself; this is only the instruction.
const SIGNUP_CONFIRMATION_MESSAGE: &str =
    "Check your email to confirm your account, then sign in.";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the external collaborators.
///
/// Both collaborators are optional: the server starts without them and the
/// affected routes answer `server_misconfigured` until they are deployed.
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<W: WorkerClient, I: IdentityProvider> {
    /// Relay service over the processing worker, when configured
    pub relay: Option<Arc<RelayService<W>>>,

    /// Identity provider client, when configured
    pub identity: Option<Arc<I>>,
}

impl<W: WorkerClient, I: IdentityProvider> AppState<W, I> {
    /// Create application state from optional collaborators.
    pub fn new(relay: Option<RelayService<W>>, identity: Option<I>) -> Self {
        Self {
            relay: relay.map(Arc::new),
            identity: identity.map(Arc::new),
        }
    }
}

impl<W: WorkerClient, I: IdentityProvider> Clone for AppState<W, I> {
    fn clone(&self) -> Self {
        Self {
            relay: self.relay.as_ref().map(Arc::clone),
            identity: self.identity.as_ref().map(Arc::clone),
        }
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Credentials payload for the sign-up and sign-in routes.
#[derive(Debug, Deserialize)]
pub struct CredentialsPayload {
    pub email: String,
    pub password: String,
}

/// JSON error body for all API error conditions.
///
/// `error` is a stable machine-readable code; `details` carries upstream
/// diagnostics for worker errors; `message` carries verbatim provider text
/// for identity errors.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub ok: bool,

    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Create an error body with the given machine-readable code.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
            details: None,
            message: None,
        }
    }

    /// Attach upstream diagnostic detail (serialized even when null).
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach a human-readable message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Successful sign-up response.
#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub ok: bool,
    pub message: String,
}

/// Successful sign-in response.
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub ok: bool,
    pub access_token: String,
    pub email: Option<String>,
}

/// Current-user response.
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub ok: bool,
    pub user_id: String,
    pub email: Option<String>,
}

/// Sign-out response.
#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub ok: bool,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert RelayError to HTTP response.
///
/// Status and code mapping:
/// - no file field        -> 400 `no_file_provided`
/// - missing configuration -> 500 `server_misconfigured`
/// - oversize upload      -> 413 `payload_too_large`
/// - worker failure       -> 502 `worker_error` (+ upstream details)
/// - anything else        -> 500 `unexpected_server_error`
///
/// 5xx errors are logged at ERROR level, 4xx at WARN.
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            RelayError::NoFileProvided => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new("no_file_provided"),
            ),

            RelayError::Misconfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody::new("server_misconfigured"),
            ),

            RelayError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiErrorBody::new("payload_too_large"),
            ),

            RelayError::Worker(worker_err) => (
                StatusCode::BAD_GATEWAY,
                ApiErrorBody::new("worker_error").with_details(worker_err.details()),
            ),

            RelayError::Unexpected(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody::new("unexpected_server_error"),
            ),
        };

        if status.is_server_error() {
            error!(
                error_type = body.error.as_str(),
                status = status.as_u16(),
                "Relay error: {}",
                self
            );
        } else {
            warn!(
                error_type = body.error.as_str(),
                status = status.as_u16(),
                "Relay client error: {}",
                self
            );
        }

        (status, Json(body)).into_response()
    }
}

/// Wrapper for auth route errors to implement IntoResponse.
#[derive(Debug)]
pub enum AuthApiError {
    /// Identity provider URL or API key is not configured
    Misconfigured,

    /// No usable bearer token on a session-scoped route
    NotSignedIn,

    /// The provider call failed
    Provider(IdentityError),
}

impl From<IdentityError> for AuthApiError {
    fn from(err: IdentityError) -> Self {
        AuthApiError::Provider(err)
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AuthApiError::Misconfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody::new("server_misconfigured"),
            ),

            AuthApiError::NotSignedIn => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody::new("not_signed_in"),
            ),

            AuthApiError::Provider(IdentityError::Rejected { status, message }) => (
                // Relay the provider's status when it is a sensible error
                // status, otherwise degrade to 400
                StatusCode::from_u16(*status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_REQUEST),
                ApiErrorBody::new("identity_error").with_message(message.clone()),
            ),

            AuthApiError::Provider(IdentityError::Unreachable(_)) => (
                StatusCode::BAD_GATEWAY,
                ApiErrorBody::new("identity_unreachable"),
            ),

            AuthApiError::Provider(IdentityError::Malformed(message)) => (
                StatusCode::BAD_GATEWAY,
                ApiErrorBody::new("identity_error").with_message(message.clone()),
            ),
        };

        // Missing tokens and provider rejections are expected traffic from
        // the client-side session gate; keep them quiet
        match &self {
            AuthApiError::NotSignedIn => {
                debug!(status = status.as_u16(), "Auth check failed: not signed in");
            }
            AuthApiError::Provider(IdentityError::Rejected { message, .. }) => {
                debug!(
                    status = status.as_u16(),
                    "Identity provider rejected request: {}", message
                );
            }
            other => {
                error!(status = status.as_u16(), "Auth route error: {:?}", other);
            }
        }

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Relay Handler
// =============================================================================

/// Handle relay requests.
///
/// # Endpoint
///
/// `POST /api/process`
///
/// # Request
///
/// Multipart form body with exactly one field named `file`.
///
/// # Response
///
/// - `200 OK`: the worker's JSON reply, forwarded verbatim
/// - `400 Bad Request`: `{ok:false, error:"no_file_provided"}`
/// - `413 Payload Too Large`: `{ok:false, error:"payload_too_large"}`
/// - `500 Internal Server Error`: `server_misconfigured` or
///   `unexpected_server_error`
/// - `502 Bad Gateway`: `{ok:false, error:"worker_error", details}`
pub async fn process_handler<W: WorkerClient, I: IdentityProvider>(
    State(state): State<AppState<W, I>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<serde_json::Value>, RelayError> {
    // A request that is not multipart at all carries no file field either
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Multipart rejection: {}", rejection);
        RelayError::NoFileProvided
    })?;

    let upload = read_upload(&mut multipart).await?;

    // Configuration check happens after the file check (matching the
    // endpoint contract) but always before the outbound call
    let relay = state.relay.as_ref().ok_or(RelayError::Misconfigured)?;

    let reply = relay.process(upload).await?;
    Ok(Json(reply))
}

/// Read the `file` field out of the inbound multipart body.
async fn read_upload(multipart: &mut Multipart) -> Result<UploadRequest, RelayError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(classify_multipart_error)?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(|ct| ct.to_string());
        let data = field.bytes().await.map_err(classify_multipart_error)?;

        return Ok(UploadRequest::new(file_name, content_type, data));
    }

    Err(RelayError::NoFileProvided)
}

/// Classify a multipart read failure: body-limit overruns get their own
/// status, everything else is the generic catch-all.
fn classify_multipart_error(err: MultipartError) -> RelayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RelayError::PayloadTooLarge
    } else {
        RelayError::Unexpected(err.to_string())
    }
}

// =============================================================================
// Auth Handlers
// =============================================================================

/// Handle sign-up requests.
///
/// # Endpoint
///
/// `POST /api/auth/signup` with JSON body `{email, password}`.
///
/// # Response
///
/// - `200 OK`: `{ok:true, message}` - confirmation email instruction
/// - provider status: `{ok:false, error:"identity_error", message}` with the
///   provider's error text verbatim
/// - `500`: `server_misconfigured` when the provider is not configured
pub async fn signup_handler<W: WorkerClient, I: IdentityProvider>(
    State(state): State<AppState<W, I>>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<SignUpResponse>, AuthApiError> {
    let identity = state.identity.as_ref().ok_or(AuthApiError::Misconfigured)?;

    identity
        .sign_up(&Credentials::new(payload.email, payload.password))
        .await?;

    Ok(Json(SignUpResponse {
        ok: true,
        message: SIGNUP_CONFIRMATION_MESSAGE.to_string(),
    }))
}

/// Handle sign-in requests.
///
/// # Endpoint
///
/// `POST /api/auth/signin` with JSON body `{email, password}`.
///
/// # Response
///
/// - `200 OK`: `{ok:true, access_token, email}`
/// - provider status: `{ok:false, error:"identity_error", message}` with the
///   provider's error text verbatim
pub async fn signin_handler<W: WorkerClient, I: IdentityProvider>(
    State(state): State<AppState<W, I>>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<SignInResponse>, AuthApiError> {
    let identity = state.identity.as_ref().ok_or(AuthApiError::Misconfigured)?;

    let session = identity
        .sign_in(&Credentials::new(payload.email, payload.password))
        .await?;

    Ok(Json(SignInResponse {
        ok: true,
        access_token: session.access_token,
        email: session.email,
    }))
}

/// Handle current-user requests.
///
/// # Endpoint
///
/// `GET /api/auth/user` with `Authorization: Bearer <token>`.
///
/// # Response
///
/// - `200 OK`: `{ok:true, user_id, email}`
/// - `401 Unauthorized`: `{ok:false, error:"not_signed_in"}` when the token
///   is absent or the provider rejects it
pub async fn user_handler<W: WorkerClient, I: IdentityProvider>(
    State(state): State<AppState<W, I>>,
    headers: HeaderMap,
) -> Result<Json<CurrentUserResponse>, AuthApiError> {
    let identity = state.identity.as_ref().ok_or(AuthApiError::Misconfigured)?;
    let token = bearer_token(&headers).ok_or(AuthApiError::NotSignedIn)?;

    // Token-validation failures are the expected "signed out" answer for the
    // client-side gate, not an error worth relaying
    let user = identity.current_user(token).await.map_err(|e| match e {
        IdentityError::Rejected { .. } => AuthApiError::NotSignedIn,
        other => AuthApiError::Provider(other),
    })?;

    Ok(Json(CurrentUserResponse {
        ok: true,
        user_id: user.user_id,
        email: user.email,
    }))
}

/// Handle sign-out requests.
///
/// # Endpoint
///
/// `POST /api/auth/signout` with `Authorization: Bearer <token>`.
///
/// Sign-out is best effort and idempotent: a missing token or a provider
/// failure still answers `{ok:true}`, and the browser clears its stored
/// token regardless.
pub async fn signout_handler<W: WorkerClient, I: IdentityProvider>(
    State(state): State<AppState<W, I>>,
    headers: HeaderMap,
) -> Result<Json<SignOutResponse>, AuthApiError> {
    let identity = state.identity.as_ref().ok_or(AuthApiError::Misconfigured)?;

    if let Some(token) = bearer_token(&headers) {
        if let Err(e) = identity.sign_out(token).await {
            warn!("Sign-out failed upstream: {}", e);
        }
    }

    Ok(Json(SignOutResponse { ok: true }))
}

/// Extract a bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Health and Page Handlers
// =============================================================================

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Serve the landing page.
pub async fn landing_page_handler() -> Html<String> {
    Html(pages::landing_page())
}

/// Serve the auth page.
pub async fn auth_page_handler() -> Html<String> {
    Html(pages::auth_page())
}

/// Serve the processing page.
pub async fn process_page_handler() -> Html<String> {
    Html(pages::process_page())
}

// =============================================================================
// Tests
// =============================================================================

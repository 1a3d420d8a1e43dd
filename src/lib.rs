//! # Transcript Relay
//!
//! A small internal web shell for cleaning transcripts: a signed-in user
//! uploads a subtitle or PDF file, the server relays it to an external
//! processing worker for extraction and cleanup, and the resulting text is
//! shown in the browser for copy/edit.
//!
//! The heavy lifting lives elsewhere by design: credentials are handled by
//! an external identity provider and the file processing by an external
//! worker reached over HTTP. This crate is the glue - pages, one relay
//! endpoint, and thin passthrough routes for the identity operations.
//!
//! ## Features
//!
//! - **Relay endpoint**: accepts one multipart upload, forwards it to the
//!   worker with a shared-secret header, and returns the worker's JSON
//!   reply verbatim
//! - **Built-in pages**: landing, auth form, and processing page with
//!   drag-drop upload, served as self-contained HTML documents
//! - **Delegated identity**: sign up / sign in / current user / sign out
//!   proxied to a GoTrue-compatible provider, with provider error text
//!   relayed verbatim
//! - **Stateless**: no database, no job history, no shared mutable state
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`worker`] - Client for the external processing worker
//! - [`identity`] - Client for the external identity provider
//! - [`relay`] - Relay orchestration between handlers and worker
//! - [`server`] - Axum-based HTTP server, pages, and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use transcript_relay::{
//!     create_router, AppState, HttpIdentityProvider, HttpWorkerClient, RelayService,
//!     RouterConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = AppState::new(
//!         Some(RelayService::new(HttpWorkerClient::new(
//!             "https://worker.internal/webhook/clean",
//!             "shared-secret",
//!         ))),
//!         Some(HttpIdentityProvider::new(
//!             "https://id.example.com/auth/v1",
//!             "anon-key",
//!         )),
//!     );
//!
//!     let router = create_router(state, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod relay;
pub mod server;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use error::{IdentityError, RelayError, WorkerError};
pub use identity::{Credentials, HttpIdentityProvider, IdentityProvider, Session, UserInfo};
pub use relay::{RelayService, ACCEPTED_EXTENSIONS};
pub use server::{
    create_router, ApiErrorBody, AppState, AuthApiError, CurrentUserResponse, HealthResponse,
    RouterConfig, SignInResponse, SignOutResponse, SignUpResponse,
};
pub use worker::{HttpWorkerClient, UploadRequest, WorkerClient, WORKER_SECRET_HEADER};

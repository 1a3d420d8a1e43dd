//! Router configuration for transcript-relay.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! request tracing, and the upload body limit.
//!
//! # Route Structure
//!
//! ```text
//! /                    - Landing page
//! /auth                - Auth form page
//! /process             - Processing page
//! /health              - Health check
//! /api/process         - Relay endpoint (POST, multipart)
//! /api/auth/signup     - Identity passthrough (POST)
//! /api/auth/signin     - Identity passthrough (POST)
//! /api/auth/signout    - Identity passthrough (POST)
//! /api/auth/user       - Identity passthrough (GET)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use transcript_relay::server::{create_router, AppState, RouterConfig};
//! use transcript_relay::identity::HttpIdentityProvider;
//! use transcript_relay::relay::RelayService;
//! use transcript_relay::worker::HttpWorkerClient;
//!
//! let state = AppState::new(
//!     Some(RelayService::new(HttpWorkerClient::new(worker_url, secret))),
//!     Some(HttpIdentityProvider::new(identity_url, api_key)),
//! );
//! let router = create_router(state, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::identity::IdentityProvider;
use crate::worker::WorkerClient;

use super::handlers::{
    auth_page_handler, health_handler, landing_page_handler, process_handler,
    process_page_handler, signin_handler, signout_handler, signup_handler, user_handler, AppState,
};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Upload size cap in bytes, enforced on the request body
    pub max_upload_bytes: usize,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - The upload cap is 25 MB
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None, // Allow any origin by default
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Set the upload size cap in bytes.
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Page routes (landing, auth, processing) and the health check
/// - The relay endpoint and identity passthrough routes
/// - The upload body limit
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router<W, I>(state: AppState<W, I>, config: RouterConfig) -> Router
where
    W: WorkerClient + 'static,
    I: IdentityProvider + 'static,
{
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/", get(landing_page_handler))
        .route("/auth", get(auth_page_handler))
        .route("/process", get(process_page_handler))
        .route("/health", get(health_handler))
        .route("/api/process", post(process_handler::<W, I>))
        .route("/api/auth/signup", post(signup_handler::<W, I>))
        .route("/api/auth/signin", post(signin_handler::<W, I>))
        .route("/api/auth/signout", post(signout_handler::<W, I>))
        .route("/api/auth/user", get(user_handler::<W, I>))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            // Parse origins into HeaderValues
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

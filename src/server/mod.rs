//! HTTP server layer for transcript-relay.
//!
//! This module provides the pages and the API routes of the web shell.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │     GET /process            POST /api/process                   │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    pages    │  │        routes           │  │
//! │  │ (requests)  │  │   (HTML)    │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod pages;
pub mod routes;

pub use handlers::{
    auth_page_handler, health_handler, landing_page_handler, process_handler,
    process_page_handler, signin_handler, signout_handler, signup_handler, user_handler,
    ApiErrorBody, AppState, AuthApiError, CredentialsPayload, CurrentUserResponse, HealthResponse,
    SignInResponse, SignOutResponse, SignUpResponse,
};
pub use routes::{create_router, RouterConfig};

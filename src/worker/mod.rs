//! Processing worker client layer.
//!
//! The worker is an external HTTP service that performs the actual file
//! extraction and cleanup. This module only knows how to hand it a file and
//! interpret the transport-level outcome; the worker's internals are opaque.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             RelayService                │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          WorkerClient Trait             │
//! │   (transport-agnostic worker seam)      │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           HttpWorkerClient              │
//! │  (reqwest multipart POST + secret)      │
//! └─────────────────────────────────────────┘
//! ```

mod client;
mod http_client;

pub use client::{UploadRequest, WorkerClient};
pub use http_client::{HttpWorkerClient, WORKER_SECRET_HEADER};

//! Relay orchestration layer.
//!
//! Sits between the HTTP handlers and the worker client: one inbound upload
//! in, one outbound worker call out, nothing stored in between.

mod service;

pub use service::RelayService;

/// File extensions offered by the upload picker.
///
/// This is a UI-level filter only; the relay endpoint accepts any file and
/// leaves content validation to the worker.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".vtt", ".srt", ".txt", ".pdf"];

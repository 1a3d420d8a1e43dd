//! Configuration management for transcript-relay.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `RELAY_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use transcript_relay::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! - `RELAY_HOST` - Server bind address (default: 0.0.0.0)
//! - `RELAY_PORT` - Server port (default: 3000)
//! - `RELAY_WORKER_URL` - Processing worker URL
//! - `RELAY_WORKER_SECRET` - Shared secret for the worker call
//! - `RELAY_IDENTITY_URL` - Identity provider base URL
//! - `RELAY_IDENTITY_API_KEY` - Identity provider API key
//! - `RELAY_MAX_UPLOAD_BYTES` - Upload size cap (default: 25 MB)
//! - `RELAY_CORS_ORIGINS` - Allowed CORS origins (comma-separated)
//!
//! The worker and identity settings are deployment secrets. The server
//! starts without them (with a loud warning) so the pages stay reachable,
//! but the affected API routes answer `server_misconfigured` until they are
//! set.

use clap::Parser;
use url::Url;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default upload size cap in bytes (25 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// =============================================================================
// CLI Arguments
// =============================================================================

/// transcript-relay - A web shell for cleaning transcripts.
///
/// Serves the upload pages and relays uploaded subtitle/PDF files to an
/// external processing worker. Authentication is delegated to an external
/// identity provider.
#[derive(Parser, Debug, Clone)]
#[command(name = "transcript-relay")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "RELAY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "RELAY_PORT")]
    pub port: u16,

    // =========================================================================
    // Worker Configuration
    // =========================================================================
    /// URL of the processing worker that receives relayed files.
    ///
    /// Without it (and the secret) the relay endpoint answers
    /// `server_misconfigured`.
    #[arg(long, env = "RELAY_WORKER_URL")]
    pub worker_url: Option<String>,

    /// Shared secret sent to the worker in the x-worker-secret header.
    ///
    /// Never exposed to the browser.
    #[arg(long, env = "RELAY_WORKER_SECRET")]
    pub worker_secret: Option<String>,

    // =========================================================================
    // Identity Provider Configuration
    // =========================================================================
    /// Base URL of the external identity provider.
    #[arg(long, env = "RELAY_IDENTITY_URL")]
    pub identity_url: Option<String>,

    /// API key for the identity provider.
    #[arg(long, env = "RELAY_IDENTITY_API_KEY")]
    pub identity_api_key: Option<String>,

    // =========================================================================
    // Upload Configuration
    // =========================================================================
    /// Maximum accepted upload size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "RELAY_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "RELAY_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref worker_url) = self.worker_url {
            validate_http_url(worker_url, "worker URL")?;
        }

        if let Some(ref identity_url) = self.identity_url {
            validate_http_url(identity_url, "identity provider URL")?;
        }

        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether both worker settings are present.
    pub fn worker_configured(&self) -> bool {
        self.worker_url.is_some() && self.worker_secret.is_some()
    }

    /// Whether both identity provider settings are present.
    pub fn identity_configured(&self) -> bool {
        self.identity_url.is_some() && self.identity_api_key.is_some()
    }
}

/// Check that a configured URL parses and uses an HTTP scheme.
fn validate_http_url(raw: &str, label: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("Invalid {}: {}", label, e))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!(
            "Invalid {}: expected http or https, got {}",
            label,
            url.scheme()
        ));
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

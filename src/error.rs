use thiserror::Error;

/// Errors from the single outbound call to the processing worker
#[derive(Debug, Clone, Error)]
pub enum WorkerError {
    /// The worker could not be reached at all
    #[error("Worker unreachable: {0}")]
    Unreachable(String),

    /// The worker answered with a non-success status
    #[error("Worker returned status {status}")]
    UpstreamStatus {
        status: u16,
        /// Parsed upstream body, when the worker sent parseable JSON
        details: Option<serde_json::Value>,
    },

    /// The worker answered with a success status but an unparseable body
    #[error("Worker returned an unparseable body (status {status})")]
    MalformedBody { status: u16 },
}

impl WorkerError {
    /// Diagnostic detail to attach to the relay response: the parsed upstream
    /// body when one exists, `null` otherwise.
    pub fn details(&self) -> serde_json::Value {
        match self {
            WorkerError::UpstreamStatus {
                details: Some(details),
                ..
            } => details.clone(),
            _ => serde_json::Value::Null,
        }
    }
}

/// Errors from calls to the external identity provider
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// The provider rejected the request; `message` is the provider's own
    /// error text, relayed verbatim
    #[error("Identity provider rejected the request: {message}")]
    Rejected { status: u16, message: String },

    /// The provider could not be reached at all
    #[error("Identity provider unreachable: {0}")]
    Unreachable(String),

    /// The provider answered with a body that does not match its contract
    #[error("Identity provider returned an unexpected body: {0}")]
    Malformed(String),
}

/// Errors from handling a relay request end to end
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request carried no `file` multipart field
    #[error("No file provided")]
    NoFileProvided,

    /// The worker URL or shared secret is not configured on the server
    #[error("Worker URL or shared secret not configured")]
    Misconfigured,

    /// The uploaded file exceeds the configured size cap
    #[error("Uploaded file exceeds the configured size cap")]
    PayloadTooLarge,

    /// The outbound worker call failed
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// Anything not classified above
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

//! Identity provider trait and session types.

use async_trait::async_trait;

use crate::error::IdentityError;

// =============================================================================
// Types
// =============================================================================

/// Email/password credentials submitted by the auth form.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// A session issued by the provider after a successful sign-in.
///
/// The access token is opaque to this crate; it is handed to the browser,
/// stored there, and echoed back on session-scoped calls.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub email: Option<String>,
}

/// The provider's view of the currently signed-in user.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub user_id: String,
    pub email: Option<String>,
}

// =============================================================================
// Identity Provider Trait
// =============================================================================

/// The identity operations this crate consumes.
///
/// Implementations talk to an external provider; nothing here verifies
/// credentials or mints tokens locally.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account. The provider sends its own confirmation email;
    /// success here only means the request was accepted.
    async fn sign_up(&self, credentials: &Credentials) -> Result<(), IdentityError>;

    /// Exchange credentials for a session.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, IdentityError>;

    /// Resolve the user behind an access token.
    async fn current_user(&self, access_token: &str) -> Result<UserInfo, IdentityError>;

    /// Revoke a session.
    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;
}

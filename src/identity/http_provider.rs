//! HTTP implementation of the identity provider client.
//!
//! Speaks a GoTrue-compatible REST surface:
//!
//! ```text
//! POST {base}/signup                        - register (email, password)
//! POST {base}/token?grant_type=password     - sign in, returns access_token
//! GET  {base}/user                          - resolve the token's user
//! POST {base}/logout                        - revoke the session
//! ```
//!
//! Every request carries the project API key in an `apikey` header;
//! session-scoped requests also carry `Authorization: Bearer <token>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IdentityError;

use super::{Credentials, IdentityProvider, Session, UserInfo};

const API_KEY_HEADER: &str = "apikey";

// =============================================================================
// Wire Shapes
// =============================================================================

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    user: Option<ProviderUser>,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

// =============================================================================
// HTTP Identity Provider
// =============================================================================

/// Identity provider client over HTTP.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentityProvider {
    /// Create a new client for the given provider base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// The configured provider base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success provider response into a `Rejected` error carrying
    /// the provider's own message verbatim.
    async fn rejection(response: reqwest::Response) -> IdentityError {
        let status = response.status().as_u16();
        let body = response.bytes().await.unwrap_or_default();
        IdentityError::Rejected {
            status,
            message: extract_provider_message(&body, status),
        }
    }
}

/// Pull the human-readable message out of a provider error body.
///
/// GoTrue deployments have answered with several shapes over time
/// (`error_description`, `msg`, `message`, `error`); the raw body text is
/// the fallback so the message stays verbatim even for unknown shapes.
fn extract_provider_message(body: &[u8], status: u16) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    let raw = String::from_utf8_lossy(body);
    let raw = raw.trim();
    if raw.is_empty() {
        format!("Identity provider returned status {}", status)
    } else {
        raw.to_string()
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_up(&self, credentials: &Credentials) -> Result<(), IdentityError> {
        let response = self
            .http
            .post(self.endpoint("/signup"))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&CredentialsBody {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        debug!(email = %credentials.email, "Sign-up accepted by identity provider");
        Ok(())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, IdentityError> {
        let response = self
            .http
            .post(self.endpoint("/token?grant_type=password"))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&CredentialsBody {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Malformed(e.to_string()))?;

        Ok(Session {
            access_token: token.access_token,
            email: token.user.and_then(|u| u.email),
        })
    }

    async fn current_user(&self, access_token: &str) -> Result<UserInfo, IdentityError> {
        let response = self
            .http
            .get(self.endpoint("/user"))
            .header(API_KEY_HEADER, &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let user: ProviderUser = response
            .json()
            .await
            .map_err(|e| IdentityError::Malformed(e.to_string()))?;

        Ok(UserInfo {
            user_id: user.id,
            email: user.email,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let response = self
            .http
            .post(self.endpoint("/logout"))
            .header(API_KEY_HEADER, &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        Ok(())
    }
}

//! Credential Manager for the Drive API.
//!
//! This module turns service-account credential material into bearer tokens:
//! - [`credentials`] resolves the key from a file path or inline JSON
//! - [`ServiceAccountProvider`] signs a JWT and exchanges it for an access token
//!
//! # Example
//!
//! ```no_run
//! use google_drive_connector::auth::{AuthProvider, ServiceAccountKey, ServiceAccountProvider};
//! use google_drive_connector::auth::scopes;
//!
//! # async fn example(json: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let key = ServiceAccountKey::from_json(json)?;
//! let provider = ServiceAccountProvider::from_key(key, vec![scopes::DRIVE_READONLY.to_string()])?;
//!
//! let token = provider.get_access_token().await?;
//! # Ok(())
//! # }
//! ```

use crate::errors::AuthenticationError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};

pub mod credentials;
mod service_account;

pub use credentials::{resolve_service_account_key, CredentialSource};
pub use service_account::{ServiceAccountKey, ServiceAccountProvider};

/// Default Google OAuth2 token URL.
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Token expiry buffer (5 minutes) - refresh tokens proactively before expiry.
pub const TOKEN_EXPIRY_BUFFER_SECONDS: i64 = 300;

/// JWT lifetime for service account tokens (1 hour).
pub const JWT_LIFETIME_SECONDS: i64 = 3600;

/// OAuth 2.0 scopes for Google Drive.
pub mod scopes {
    /// Read-only access to file metadata and content.
    pub const DRIVE_READONLY: &str = "https://www.googleapis.com/auth/drive.readonly";
}

/// Authentication provider abstraction.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Get an access token for API requests, reusing a cached one while it is fresh.
    async fn get_access_token(&self) -> Result<AccessToken, AuthenticationError>;
}

/// Access token with metadata.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The token string.
    pub token: SecretString,

    /// Token type (usually "Bearer").
    pub token_type: String,

    /// Expiration time.
    pub expires_at: DateTime<Utc>,

    /// Scopes granted.
    pub scopes: Vec<String>,
}

impl AccessToken {
    /// Creates a new access token.
    pub fn new(
        token: impl Into<String>,
        token_type: impl Into<String>,
        expires_at: DateTime<Utc>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            token: SecretString::new(token.into()),
            token_type: token_type.into(),
            expires_at,
            scopes,
        }
    }

    /// Checks if the token needs proactive refresh (within 5 minutes of expiry).
    pub fn needs_refresh(&self) -> bool {
        let threshold = self.expires_at - Duration::seconds(TOKEN_EXPIRY_BUFFER_SECONDS);
        Utc::now() >= threshold
    }

    /// Returns the authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }
}

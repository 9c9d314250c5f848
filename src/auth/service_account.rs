use super::{AccessToken, AuthProvider, JWT_LIFETIME_SECONDS, TOKEN_URL};
use crate::errors::{AuthenticationError, ConfigurationError};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Service account key as downloaded from the Google Cloud console.
///
/// Only the fields needed for the JWT-bearer grant are kept.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Credential type; `service_account` when present.
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,

    /// Service account email, used as the JWT issuer.
    pub client_email: String,

    /// RSA private key in PEM format.
    pub private_key: SecretString,

    /// Key ID, sent as the JWT `kid` header.
    #[serde(default)]
    pub private_key_id: Option<String>,

    /// Token endpoint the JWT is exchanged at.
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Parses key JSON, rejecting credential types other than `service_account`.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let key: ServiceAccountKey = serde_json::from_str(json).map_err(|e| {
            ConfigurationError::InvalidCredentials(format!(
                "Failed to parse service account JSON: {}",
                e
            ))
        })?;

        match key.key_type.as_deref() {
            None | Some("service_account") => Ok(key),
            Some(other) => Err(ConfigurationError::InvalidCredentials(format!(
                "Expected a service_account key, found type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

/// Service account authentication provider.
///
/// Signs an RS256 JWT with the account's private key and exchanges it for an
/// access token at the token endpoint.
///
/// # Thread Safety
///
/// The provider is shared across request handlers. The token exchange runs
/// while holding the cache write lock and re-checks the cache first, so
/// concurrent callers that find a stale token trigger a single exchange.
pub struct ServiceAccountProvider {
    service_account_email: String,
    encoding_key: EncodingKey,
    private_key_id: Option<String>,
    scopes: Vec<String>,
    token_url: String,
    cached_token: Arc<RwLock<Option<AccessToken>>>,
    http_client: Client,
}

impl ServiceAccountProvider {
    /// Creates a new service account provider from a PEM private key.
    pub fn new(
        service_account_email: impl Into<String>,
        private_key: &SecretString,
        scopes: Vec<String>,
    ) -> Result<Self, ConfigurationError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key.expose_secret().as_bytes())
            .map_err(|e| {
                ConfigurationError::InvalidCredentials(format!("Invalid private key: {}", e))
            })?;

        Ok(Self {
            service_account_email: service_account_email.into(),
            encoding_key,
            private_key_id: None,
            scopes,
            token_url: TOKEN_URL.to_string(),
            cached_token: Arc::new(RwLock::new(None)),
            http_client: Client::new(),
        })
    }

    /// Creates a provider from a parsed key file.
    pub fn from_key(
        key: ServiceAccountKey,
        scopes: Vec<String>,
    ) -> Result<Self, ConfigurationError> {
        let mut provider = Self::new(key.client_email, &key.private_key, scopes)?;
        provider.private_key_id = key.private_key_id;
        if let Some(token_uri) = key.token_uri {
            provider.token_url = token_uri;
        }
        Ok(provider)
    }

    /// Service account email this provider authenticates as.
    pub fn service_account_email(&self) -> &str {
        &self.service_account_email
    }

    /// Token endpoint in use.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    fn create_jwt(&self) -> Result<String, AuthenticationError> {
        #[derive(Serialize)]
        struct Claims<'a> {
            iss: &'a str,
            scope: String,
            aud: &'a str,
            exp: i64,
            iat: i64,
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.service_account_email,
            scope: self.scopes.join(" "),
            aud: &self.token_url,
            exp: now + JWT_LIFETIME_SECONDS,
            iat: now,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        encode(&header, &claims, &self.encoding_key).map_err(|e| {
            AuthenticationError::JwtEncodingError(format!("JWT encoding failed: {}", e))
        })
    }

    async fn exchange_jwt_for_token(&self) -> Result<AccessToken, AuthenticationError> {
        let jwt = self.create_jwt()?;

        #[derive(Serialize)]
        struct TokenRequest<'a> {
            grant_type: &'a str,
            assertion: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            #[serde(default = "default_token_type")]
            token_type: String,
            expires_in: i64,
        }

        fn default_token_type() -> String {
            "Bearer".to_string()
        }

        let request = TokenRequest {
            grant_type: "urn:ietf:params:oauth:grant-type:jwt-bearer",
            assertion: &jwt,
        };

        debug!(token_url = %self.token_url, "Exchanging service account JWT");

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                AuthenticationError::RefreshFailed(format!("HTTP request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AuthenticationError::RefreshFailed(format!(
                "Token exchange failed with status {}: {}",
                status, text
            )));
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            AuthenticationError::RefreshFailed(format!("Failed to parse response: {}", e))
        })?;

        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);

        info!(
            service_account = %self.service_account_email,
            expires_in = token_response.expires_in,
            "Authenticated using service account"
        );

        Ok(AccessToken::new(
            token_response.access_token,
            token_response.token_type,
            expires_at,
            self.scopes.clone(),
        ))
    }
}

#[async_trait]
impl AuthProvider for ServiceAccountProvider {
    async fn get_access_token(&self) -> Result<AccessToken, AuthenticationError> {
        if let Some(token) = self.cached_token.read().await.as_ref() {
            if !token.needs_refresh() {
                return Ok(token.clone());
            }
        }

        let mut cached = self.cached_token.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if !token.needs_refresh() {
                return Ok(token.clone());
            }
        }

        let token = self.exchange_jwt_for_token().await?;
        *cached = Some(token.clone());
        Ok(token)
    }
}

//! Credential resolution.
//!
//! Order: an existing key file at the configured path, then inline key JSON,
//! otherwise no valid credentials.

use super::ServiceAccountKey;
use crate::config::{env, CredentialsConfig};
use crate::errors::ConfigurationError;
use secrecy::ExposeSecret;
use std::path::PathBuf;
use tracing::{info, warn};

/// Where the service account key was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Key file on disk.
    File(PathBuf),
    /// Inline JSON from the environment.
    Inline,
}

/// Resolves the service account key from the configured sources.
pub async fn resolve_service_account_key(
    config: &CredentialsConfig,
) -> Result<(ServiceAccountKey, CredentialSource), ConfigurationError> {
    if let Some(path) = &config.credentials_path {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            let json = tokio::fs::read_to_string(path).await.map_err(|e| {
                ConfigurationError::InvalidCredentials(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let key = ServiceAccountKey::from_json(&json)?;
            info!(path = %path.display(), "Loaded service account key file");
            return Ok((key, CredentialSource::File(path.clone())));
        }

        warn!(
            path = %path.display(),
            "Credentials file does not exist, falling back to inline JSON"
        );
    }

    if let Some(json) = &config.service_account_json {
        let key = ServiceAccountKey::from_json(json.expose_secret())?;
        info!("Loaded service account key from inline JSON");
        return Ok((key, CredentialSource::Inline));
    }

    Err(ConfigurationError::MissingCredentials(format!(
        "No valid Google credentials found. Set {} or {}",
        env::CREDENTIALS_PATH,
        env::SERVICE_ACCOUNT_JSON
    )))
}

//! Drive API client, the connector's session handle.

use crate::auth::{resolve_service_account_key, scopes, AuthProvider, ServiceAccountProvider};
use crate::config::{ConnectorConfig, DriveConfig};
use crate::errors::{ConnectorError, ConnectorResult, DriveError, DriveResult};
use crate::services::FilesService;
use crate::transport::{HttpTransport, ReqwestTransport};
use std::sync::Arc;
use tracing::info;

mod executor;
pub use executor::RequestExecutor;

/// Drive API client.
///
/// One instance is built at startup and shared by every request handler. It
/// owns the authenticated token provider and the HTTP transport.
pub struct DriveClient {
    config: DriveConfig,
    auth: Arc<dyn AuthProvider>,
    executor: Arc<RequestExecutor>,
}

impl DriveClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use google_drive_connector::{DriveClient, DriveConfig};
    /// use google_drive_connector::auth::{ServiceAccountKey, ServiceAccountProvider, scopes};
    ///
    /// # fn example(json: &str) -> Result<(), Box<dyn std::error::Error>> {
    /// let key = ServiceAccountKey::from_json(json)?;
    /// let auth = ServiceAccountProvider::from_key(key, vec![scopes::DRIVE_READONLY.to_string()])?;
    ///
    /// let config = DriveConfig::builder().auth_provider(auth).build()?;
    /// let client = DriveClient::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: DriveConfig) -> DriveResult<Self> {
        config.validate()?;

        let transport = Arc::new(
            ReqwestTransport::with_settings(
                config.connect_timeout,
                &config.user_agent,
                &config.pool,
            )
            .map_err(|e| DriveError::configuration(format!("Failed to create transport: {}", e)))?,
        );

        Ok(Self::with_transport(config, transport))
    }

    /// Creates a client over a caller-supplied transport.
    pub fn with_transport(config: DriveConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let auth = config.auth_provider.clone();
        let executor = Arc::new(RequestExecutor::new(
            config.clone(),
            transport,
            auth.clone(),
        ));

        Self {
            config,
            auth,
            executor,
        }
    }

    /// Resolves service account credentials and builds a read-only client.
    ///
    /// Fails if no credential source yields a usable key; no network call is
    /// made here.
    pub async fn from_connector_config(config: &ConnectorConfig) -> ConnectorResult<Self> {
        let (key, source) = resolve_service_account_key(&config.credentials)
            .await
            .map_err(|e| ConnectorError::Auth(e.to_string()))?;

        let provider =
            ServiceAccountProvider::from_key(key, vec![scopes::DRIVE_READONLY.to_string()])
                .map_err(|e| ConnectorError::Auth(e.to_string()))?;

        info!(
            service_account = %provider.service_account_email(),
            token_url = %provider.token_url(),
            source = ?source,
            "Resolved Google credentials"
        );

        let mut builder = DriveConfig::builder()
            .auth_provider(provider)
            .timeout(config.request_timeout);
        if let Some(base_url) = &config.api_base_url {
            builder = builder.base_url(base_url.clone());
        }

        let drive_config = builder
            .build()
            .map_err(|e| ConnectorError::Auth(e.to_string()))?;

        let client =
            DriveClient::new(drive_config).map_err(|e| ConnectorError::Auth(e.to_string()))?;
        info!(base_url = %client.base_url(), "Drive client ready");
        Ok(client)
    }

    /// Fetches an access token so credential problems show up at startup.
    pub async fn authenticate(&self) -> DriveResult<()> {
        self.auth.get_access_token().await?;
        info!("Google Drive service initialized successfully");
        Ok(())
    }

    /// Access the files service for file operations.
    pub fn files(&self) -> FilesService {
        FilesService::new(self.executor.clone())
    }

    /// Gets the base URL for the API.
    pub fn base_url(&self) -> &str {
        self.config.base_url.as_str()
    }
}

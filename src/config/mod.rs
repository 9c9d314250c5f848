//! Configuration for the connector and its Drive client.
//!
//! [`ConnectorConfig`] is read from the environment at startup.
//! [`DriveConfig`] is the provider-client configuration built from it.

use crate::auth::AuthProvider;
use crate::errors::{ConfigurationError, ConnectorResult, DriveError, DriveResult};
use secrecy::SecretString;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default Drive v3 API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/drive/v3/";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Connect timeout for Drive API connections.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable names.
pub mod env {
    /// Parent folder whose entries are served (required).
    pub const FOLDER_ID: &str = "GDRIVE_FOLDER_ID";
    /// Path to a service account key file.
    pub const CREDENTIALS_PATH: &str = "GOOGLE_APPLICATION_CREDENTIALS";
    /// Inline service account key JSON.
    pub const SERVICE_ACCOUNT_JSON: &str = "GOOGLE_SERVICE_ACCOUNT_JSON";
    /// Listen port.
    pub const PORT: &str = "PORT";
    /// Listen address.
    pub const HOST: &str = "HOST";
    /// Drive API base URL override.
    pub const API_BASE_URL: &str = "GDRIVE_API_BASE_URL";
    /// Per-request timeout in seconds.
    pub const REQUEST_TIMEOUT_SECS: &str = "GDRIVE_REQUEST_TIMEOUT_SECS";
}

/// Credential sources, in resolution order.
#[derive(Debug, Clone, Default)]
pub struct CredentialsConfig {
    /// Path to a service account key file.
    pub credentials_path: Option<PathBuf>,
    /// Inline service account key JSON.
    pub service_account_json: Option<SecretString>,
}

/// Process configuration for the connector service.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Drive folder whose children are listed.
    pub folder_id: String,
    /// Where to find service account credentials.
    pub credentials: CredentialsConfig,
    /// Listen address.
    pub host: IpAddr,
    /// Listen port.
    pub port: u16,
    /// Drive API base URL override.
    pub api_base_url: Option<String>,
    /// Per-request timeout; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ConnectorConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> ConnectorResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary lookup function.
    ///
    /// Empty values are treated the same as unset ones. A missing folder id or
    /// an unparsable setting is a `ConnectorError::Config`.
    pub fn from_lookup<F>(lookup: F) -> ConnectorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let folder_id = get(env::FOLDER_ID).ok_or_else(|| {
            ConfigurationError::MissingSetting(format!(
                "{} environment variable is required",
                env::FOLDER_ID
            ))
        })?;

        let credentials = CredentialsConfig {
            credentials_path: get(env::CREDENTIALS_PATH).map(PathBuf::from),
            service_account_json: get(env::SERVICE_ACCOUNT_JSON).map(SecretString::new),
        };

        let port = match get(env::PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                ConfigurationError::InvalidConfiguration(format!(
                    "{} must be a port number, got '{}': {}",
                    env::PORT,
                    raw,
                    e
                ))
            })?,
            None => DEFAULT_PORT,
        };

        let host = match get(env::HOST) {
            Some(raw) => raw.parse::<IpAddr>().map_err(|e| {
                ConfigurationError::InvalidConfiguration(format!(
                    "{} must be an IP address, got '{}': {}",
                    env::HOST,
                    raw,
                    e
                ))
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let request_timeout = match get(env::REQUEST_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    ConfigurationError::InvalidConfiguration(format!(
                        "{} must be a number of seconds, got '{}': {}",
                        env::REQUEST_TIMEOUT_SECS,
                        raw,
                        e
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            folder_id,
            credentials,
            host,
            port,
            api_base_url: get(env::API_BASE_URL),
            request_timeout,
        })
    }

    /// Socket address the HTTP server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Configuration for the Drive client.
#[derive(Clone)]
pub struct DriveConfig {
    /// Authentication provider.
    pub auth_provider: Arc<dyn AuthProvider>,

    /// Base URL for the API, always ending in `/`.
    pub base_url: Url,

    /// Per-request timeout.
    pub timeout: Option<Duration>,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// User agent string.
    pub user_agent: String,

    /// Pool configuration.
    pub pool: PoolConfig,
}

/// Connection pool configuration.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Maximum idle connections per host.
    pub max_idle_per_host: usize,

    /// Idle timeout.
    pub idle_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            idle_timeout: Some(Duration::from_secs(90)),
        }
    }
}

impl DriveConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> DriveConfigBuilder {
        DriveConfigBuilder::new()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DriveResult<()> {
        match self.base_url.scheme() {
            "https" | "http" => {}
            other => {
                return Err(DriveError::configuration(format!(
                    "Base URL must use http or https, got '{}'",
                    other
                )))
            }
        }

        if self.base_url.cannot_be_a_base() {
            return Err(DriveError::configuration("Base URL cannot be a base"));
        }

        Ok(())
    }
}

/// Builder for DriveConfig.
pub struct DriveConfigBuilder {
    auth_provider: Option<Arc<dyn AuthProvider>>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl DriveConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            auth_provider: None,
            base_url: None,
            timeout: None,
        }
    }

    /// Sets the authentication provider.
    pub fn auth_provider<A: AuthProvider + 'static>(mut self, provider: A) -> Self {
        self.auth_provider = Some(Arc::new(provider));
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> DriveResult<DriveConfig> {
        let auth_provider = self.auth_provider.ok_or_else(|| {
            DriveError::Configuration(ConfigurationError::MissingCredentials(
                "Authentication provider is required".to_string(),
            ))
        })?;

        let mut raw_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        // Url::join drops the last segment unless the base ends with '/'
        if !raw_url.ends_with('/') {
            raw_url.push('/');
        }
        let base_url = Url::parse(&raw_url).map_err(|e| {
            DriveError::configuration(format!("Invalid base URL '{}': {}", raw_url, e))
        })?;

        let config = DriveConfig {
            auth_provider,
            base_url,
            timeout: self.timeout,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: format!("google-drive-connector/{}", env!("CARGO_PKG_VERSION")),
            pool: PoolConfig::default(),
        };

        config.validate()?;

        Ok(config)
    }
}

impl Default for DriveConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Error types for the Google Drive connector.
//!
//! Two layers live here:
//!
//! - [`DriveError`] describes what went wrong while talking to the Drive API
//!   (and the OAuth token endpoint). It is produced by the client, executor and
//!   transport layers.
//! - [`ConnectorError`] is the service-level taxonomy the HTTP surface speaks.
//!   Every variant knows the HTTP status it is reported with.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for Drive API operations.
pub type DriveResult<T> = Result<T, DriveError>;

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Failure of a Drive API or token endpoint call, grouped by cause.
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Quota error: {0}")]
    Quota(#[from] QuotaError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

impl DriveError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        DriveError::Configuration(ConfigurationError::InvalidConfiguration(msg.into()))
    }

    pub fn request(msg: impl Into<String>) -> Self {
        DriveError::Request(RequestError::ValidationError(msg.into()))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        DriveError::Resource(ResourceError::FileNotFound(msg.into()))
    }

    pub fn deserialization(msg: impl Into<String>) -> Self {
        DriveError::Response(ResponseError::DeserializationError(msg.into()))
    }

    /// True when the failure lies with the credentials rather than the request.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            DriveError::Authentication(_)
                | DriveError::Configuration(ConfigurationError::MissingCredentials(_))
                | DriveError::Configuration(ConfigurationError::InvalidCredentials(_))
        )
    }

    /// Message without the outer category prefix.
    fn detail(&self) -> String {
        match self {
            DriveError::Configuration(e) => e.to_string(),
            DriveError::Authentication(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Missing setting: {0}")]
    MissingSetting(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Key material could not be read or parsed.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The API rejected the bearer token.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The token endpoint refused the JWT or could not be reached.
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("JWT encoding error: {0}")]
    JwtEncodingError(String),

    /// No credentials were resolved at startup.
    #[error("{0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum AuthorizationError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Insufficient permissions: {0}")]
    InsufficientPermissions(String),

    #[error("Domain policy violation: {0}")]
    DomainPolicy(String),
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("File not found: {0}")]
    FileNotFound(String),
}

/// Rate and quota rejections. Reported as-is; nothing is retried.
#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("User rate limit exceeded: {0}")]
    UserRateLimitExceeded(String),

    #[error("Project rate limit exceeded: {0}")]
    ProjectRateLimitExceeded(String),

    #[error("Daily limit exceeded: {0}")]
    DailyLimitExceeded(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    /// Drive refuses to export documents above its size limit.
    #[error("Export size exceeded (max 10MB): {0}")]
    ExportSizeExceeded(String),

    #[error("Export not supported: {0}")]
    ExportNotSupported(String),
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The connection dropped while a body was being streamed.
    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),
}

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors raised by an [`HttpTransport`](crate::transport::HttpTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Network(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

impl From<TransportError> for DriveError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(msg) => DriveError::Network(NetworkError::Timeout(msg)),
            TransportError::Network(msg) => {
                DriveError::Network(NetworkError::ConnectionFailed(msg))
            }
            TransportError::Http(msg) => {
                DriveError::Response(ResponseError::UnexpectedFormat(msg))
            }
        }
    }
}

/// Service-level errors reported by the HTTP surface.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Startup configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),

    /// Credentials could not be resolved or were rejected by the provider.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Folder enumeration failed.
    #[error("Error listing files: {0}")]
    List(#[source] DriveError),

    /// File metadata or content could not be fetched.
    #[error("Error getting file content: {0}")]
    Content(#[source] DriveError),

    /// No extraction strategy exists for the declared content type.
    #[error("Unsupported file type: {mime_type}")]
    UnsupportedType { mime_type: String },

    /// Downloaded bytes were not valid UTF-8.
    #[error("File content is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// PDF bytes could not be turned into text.
    #[error("Failed to extract PDF text: {0}")]
    Extraction(String),
}

impl ConnectorError {
    /// Wraps a failed list call, lifting credential failures into `Auth`.
    pub fn list(err: DriveError) -> Self {
        if err.is_authentication() {
            ConnectorError::Auth(err.detail())
        } else {
            ConnectorError::List(err)
        }
    }

    /// Wraps a failed metadata/content call, lifting credential failures into `Auth`.
    pub fn content(err: DriveError) -> Self {
        if err.is_authentication() {
            ConnectorError::Auth(err.detail())
        } else {
            ConnectorError::Content(err)
        }
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ConnectorError::List(_)
            | ConnectorError::Content(_)
            | ConnectorError::UnsupportedType { .. } => StatusCode::BAD_REQUEST,
            ConnectorError::Config(_)
            | ConnectorError::Auth(_)
            | ConnectorError::Decode(_)
            | ConnectorError::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

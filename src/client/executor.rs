//! Request executor with auth and error handling.

use crate::auth::AuthProvider;
use crate::config::DriveConfig;
use crate::errors::{
    AuthenticationError, AuthorizationError, DriveError, DriveResult, ExportError, QuotaError,
    RequestError, ResponseError, ServerError,
};
use crate::transport::{ByteStream, HttpRequest, HttpTransport};
use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Request executor that handles HTTP requests with authentication and error mapping.
///
/// This is the core component that:
/// - Adds authentication headers to requests
/// - Executes requests through the HTTP transport
/// - Maps HTTP errors to domain errors
pub struct RequestExecutor {
    config: DriveConfig,
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl RequestExecutor {
    /// Creates a new request executor.
    pub fn new(
        config: DriveConfig,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            config,
            transport,
            auth,
        }
    }

    /// Executes a GET request and deserializes the JSON response.
    pub async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> DriveResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.build_request(path, query).await?;

        let response = self.transport.send(request).await?;
        if !response.status.is_success() {
            return Err(map_error_response(response.status, &response.body));
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            DriveError::deserialization(format!("Failed to deserialize response: {}", e))
        })
    }

    /// Executes a GET request and returns the body as a stream of chunks.
    ///
    /// Error responses are read in full and mapped before anything is returned.
    pub async fn get_stream<Q>(&self, path: &str, query: Option<&Q>) -> DriveResult<ByteStream>
    where
        Q: Serialize + ?Sized,
    {
        let request = self.build_request(path, query).await?;

        let response = self.transport.send_streaming(request).await?;
        if !response.status.is_success() {
            let chunks: Vec<Bytes> = response.body.try_collect().await?;
            let body = chunks.concat();
            return Err(map_error_response(response.status, &body));
        }

        Ok(response.body)
    }

    /// Builds a full URL from a path and optional query parameters.
    pub fn build_url<Q>(&self, path: &str, query: Option<&Q>) -> DriveResult<Url>
    where
        Q: Serialize + ?Sized,
    {
        let path = path.trim_start_matches('/');

        let mut url = self
            .config
            .base_url
            .join(path)
            .map_err(|e| DriveError::request(format!("Invalid URL: {}", e)))?;

        if let Some(query) = query {
            let encoded = serde_urlencoded::to_string(query)
                .map_err(|e| DriveError::request(format!("Invalid query parameters: {}", e)))?;
            if !encoded.is_empty() {
                url.set_query(Some(&encoded));
            }
        }

        Ok(url)
    }

    async fn build_request<Q>(&self, path: &str, query: Option<&Q>) -> DriveResult<HttpRequest>
    where
        Q: Serialize + ?Sized,
    {
        let url = self.build_url(path, query)?;

        let token = self.auth.get_access_token().await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&token.authorization_header())
                .map_err(|e| DriveError::request(format!("Invalid auth header: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        debug!(url = %url, "Sending Drive API request");

        Ok(HttpRequest {
            method: Method::GET,
            url,
            headers,
            timeout: self.config.timeout,
        })
    }
}

/// Maps an error response from the API to a domain error.
///
/// The Google error `reason` refines the status code where it matters.
pub(crate) fn map_error_response(status: StatusCode, body: &[u8]) -> DriveError {
    #[derive(serde::Deserialize)]
    struct ErrorResponse {
        error: ErrorDetail,
    }

    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        message: String,
        #[serde(default)]
        errors: Option<Vec<ErrorItem>>,
    }

    #[derive(serde::Deserialize)]
    struct ErrorItem {
        reason: Option<String>,
    }

    let (message, reason) = match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(parsed) => {
            let reason = parsed
                .error
                .errors
                .as_ref()
                .and_then(|errs| errs.first())
                .and_then(|err| err.reason.clone());
            (parsed.error.message, reason)
        }
        Err(_) => (
            format!("HTTP {}: {}", status.as_u16(), String::from_utf8_lossy(body)),
            None,
        ),
    };

    match status {
        StatusCode::BAD_REQUEST => match reason.as_deref() {
            Some("invalidParameter") => {
                DriveError::Request(RequestError::InvalidParameter(message))
            }
            Some("invalidQuery") => DriveError::Request(RequestError::InvalidQuery(message)),
            _ => DriveError::Request(RequestError::ValidationError(message)),
        },
        StatusCode::UNAUTHORIZED => {
            DriveError::Authentication(AuthenticationError::InvalidToken(message))
        }
        StatusCode::FORBIDDEN => match reason.as_deref() {
            Some("userRateLimitExceeded") => {
                DriveError::Quota(QuotaError::UserRateLimitExceeded(message))
            }
            Some("rateLimitExceeded") => {
                DriveError::Quota(QuotaError::ProjectRateLimitExceeded(message))
            }
            Some("dailyLimitExceeded") => {
                DriveError::Quota(QuotaError::DailyLimitExceeded(message))
            }
            Some("exportSizeLimitExceeded") => {
                DriveError::Export(ExportError::ExportSizeExceeded(message))
            }
            Some("cannotExportFile") | Some("fileNotDownloadable") => {
                DriveError::Export(ExportError::ExportNotSupported(message))
            }
            Some("insufficientPermissions") | Some("forbidden") => {
                DriveError::Authorization(AuthorizationError::InsufficientPermissions(message))
            }
            Some("domainPolicy") => {
                DriveError::Authorization(AuthorizationError::DomainPolicy(message))
            }
            _ => DriveError::Authorization(AuthorizationError::Forbidden(message)),
        },
        StatusCode::NOT_FOUND => DriveError::not_found(message),
        StatusCode::TOO_MANY_REQUESTS => {
            DriveError::Quota(QuotaError::UserRateLimitExceeded(message))
        }
        StatusCode::INTERNAL_SERVER_ERROR => {
            DriveError::Server(ServerError::InternalError(message))
        }
        StatusCode::BAD_GATEWAY => DriveError::Server(ServerError::BadGateway(message)),
        StatusCode::SERVICE_UNAVAILABLE => {
            DriveError::Server(ServerError::ServiceUnavailable(message))
        }
        _ => DriveError::Response(ResponseError::UnexpectedFormat(format!(
            "HTTP {}: {}",
            status.as_u16(),
            message
        ))),
    }
}

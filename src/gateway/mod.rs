//! Content gateway: folder listing and per-format text extraction.

use crate::client::DriveClient;
use crate::config::ConnectorConfig;
use crate::errors::{AuthenticationError, ConnectorError, ConnectorResult, DriveError, DriveResult};
use crate::transport::ByteStream;
use crate::types::{mime_types, DriveFile, GetFileParams, ListFilesParams};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

pub mod content_kind;
pub mod extract;

pub use content_kind::ContentKind;

/// A folder entry as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub id: String,
    pub name: String,
}

impl From<DriveFile> for FileInfo {
    fn from(file: DriveFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
        }
    }
}

/// A file together with its extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContent {
    pub id: String,
    pub name: String,
    pub content: String,
}

/// The provider operations the gateway depends on.
#[async_trait]
pub trait DriveSource: Send + Sync {
    /// Lists every file matching `params`, across all pages.
    async fn list_files(&self, params: ListFilesParams) -> DriveResult<Vec<DriveFile>>;

    /// Fetches id, name and MIME type of a file.
    async fn get_metadata(&self, file_id: &str) -> DriveResult<DriveFile>;

    /// Streams a file's stored bytes.
    async fn download(&self, file_id: &str) -> DriveResult<ByteStream>;

    /// Streams a Workspace document converted to `mime_type`.
    async fn export(&self, file_id: &str, mime_type: &str) -> DriveResult<ByteStream>;
}

#[async_trait]
impl DriveSource for DriveClient {
    async fn list_files(&self, params: ListFilesParams) -> DriveResult<Vec<DriveFile>> {
        self.files().list_all(params).await
    }

    async fn get_metadata(&self, file_id: &str) -> DriveResult<DriveFile> {
        let params = GetFileParams {
            fields: Some("id, name, mimeType".to_string()),
        };
        self.files().get(file_id, &params).await
    }

    async fn download(&self, file_id: &str) -> DriveResult<ByteStream> {
        self.files().download(file_id).await
    }

    async fn export(&self, file_id: &str, mime_type: &str) -> DriveResult<ByteStream> {
        self.files().export(file_id, mime_type).await
    }
}

/// Source installed when no credentials could be resolved at startup.
///
/// Every call fails with the resolution error as an authentication failure.
pub struct UnauthenticatedSource {
    reason: String,
}

impl UnauthenticatedSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> DriveError {
        DriveError::Authentication(AuthenticationError::Unavailable(self.reason.clone()))
    }
}

#[async_trait]
impl DriveSource for UnauthenticatedSource {
    async fn list_files(&self, _params: ListFilesParams) -> DriveResult<Vec<DriveFile>> {
        Err(self.error())
    }

    async fn get_metadata(&self, _file_id: &str) -> DriveResult<DriveFile> {
        Err(self.error())
    }

    async fn download(&self, _file_id: &str) -> DriveResult<ByteStream> {
        Err(self.error())
    }

    async fn export(&self, _file_id: &str, _mime_type: &str) -> DriveResult<ByteStream> {
        Err(self.error())
    }
}

/// Lists a configured folder and turns its files into text.
pub struct ContentGateway {
    source: Arc<dyn DriveSource>,
    folder_id: String,
}

impl ContentGateway {
    pub fn new(source: Arc<dyn DriveSource>, folder_id: impl Into<String>) -> Self {
        Self {
            source,
            folder_id: folder_id.into(),
        }
    }

    /// Builds the gateway the binary serves.
    ///
    /// Credential problems are logged rather than returned: without a usable
    /// key the gateway is backed by an [`UnauthenticatedSource`].
    pub async fn connect(config: &ConnectorConfig) -> Self {
        let resolved = DriveClient::from_connector_config(config).await;
        let source: Arc<dyn DriveSource> = match resolved {
            Ok(client) => {
                if let Err(e) = client.authenticate().await {
                    error!(error = %e, "Initial Google Drive authentication failed");
                }
                Arc::new(client)
            }
            Err(e) => {
                error!(error = %e, "Google Drive credentials unavailable");
                let reason = match e {
                    ConnectorError::Auth(reason) => reason,
                    other => other.to_string(),
                };
                Arc::new(UnauthenticatedSource::new(reason))
            }
        };

        Self::new(source, config.folder_id.clone())
    }

    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// Lists the non-trashed children of the configured folder, in provider order.
    pub async fn list_files(&self) -> ConnectorResult<Vec<FileInfo>> {
        let files = self
            .source
            .list_files(ListFilesParams::children_of(&self.folder_id))
            .await
            .map_err(ConnectorError::list)?;

        info!(folder_id = %self.folder_id, count = files.len(), "Listed folder files");
        Ok(files.into_iter().map(FileInfo::from).collect())
    }

    /// Fetches a file and extracts its text according to its declared type.
    pub async fn get_file_content(&self, file_id: &str) -> ConnectorResult<FileContent> {
        let metadata = self
            .source
            .get_metadata(file_id)
            .await
            .map_err(ConnectorError::content)?;

        let kind = ContentKind::from_mime_type(&metadata.mime_type);
        debug!(
            file_id,
            mime_type = %metadata.mime_type,
            kind = %kind,
            "Dispatching content extraction"
        );

        let content = match &kind {
            ContentKind::Document | ContentKind::Spreadsheet | ContentKind::Presentation => {
                let target = kind.export_mime_type().unwrap_or(mime_types::TEXT_PLAIN);
                let stream = self
                    .source
                    .export(file_id, target)
                    .await
                    .map_err(ConnectorError::content)?;
                let bytes = extract::collect_chunks(stream)
                    .await
                    .map_err(ConnectorError::content)?;
                extract::decode_utf8(bytes)?
            }
            ContentKind::Pdf => {
                let bytes = self.fetch_media(file_id).await?;
                tokio::task::spawn_blocking(move || extract::pdf_text(&bytes))
                    .await
                    .map_err(|e| ConnectorError::Extraction(e.to_string()))??
            }
            ContentKind::Text => extract::decode_utf8(self.fetch_media(file_id).await?)?,
            ContentKind::Unsupported(mime_type) => {
                return Err(ConnectorError::UnsupportedType {
                    mime_type: mime_type.clone(),
                });
            }
        };

        Ok(FileContent {
            id: metadata.id,
            name: metadata.name,
            content,
        })
    }

    async fn fetch_media(&self, file_id: &str) -> ConnectorResult<Vec<u8>> {
        let stream = self
            .source
            .download(file_id)
            .await
            .map_err(ConnectorError::content)?;
        extract::collect_chunks(stream)
            .await
            .map_err(ConnectorError::content)
    }
}

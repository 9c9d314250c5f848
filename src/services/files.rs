//! Files service for the Drive API.
//!
//! Read-only subset of `files` operations:
//! - List (with automatic pagination)
//! - Metadata lookup
//! - Media download and Workspace export, both as chunk streams

use crate::client::RequestExecutor;
use crate::errors::{DriveError, DriveResult, RequestError};
use crate::transport::ByteStream;
use crate::types::*;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Characters escaped in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Serialize)]
struct MediaParams {
    alt: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportParams<'a> {
    mime_type: &'a str,
}

/// Service for file operations.
pub struct FilesService {
    executor: Arc<RequestExecutor>,
}

impl FilesService {
    /// Creates a new files service.
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists a single page of files.
    pub async fn list(&self, params: &ListFilesParams) -> DriveResult<FileList> {
        if let Some(page_size) = params.page_size {
            if !(1..=1000).contains(&page_size) {
                return Err(DriveError::Request(RequestError::InvalidParameter(
                    "pageSize must be between 1 and 1000".to_string(),
                )));
            }
        }

        self.executor.get_json("files", Some(params)).await
    }

    /// Lists all files matching `params`, following `nextPageToken` until exhausted.
    ///
    /// Files are returned in the order the API produced them.
    pub async fn list_all(&self, params: ListFilesParams) -> DriveResult<Vec<DriveFile>> {
        let mut files = Vec::new();
        let mut current = params;

        loop {
            let page = self.list(&current).await?;
            debug!(
                page_files = page.files.len(),
                has_next = page.next_page_token.is_some(),
                "Fetched file list page"
            );
            files.extend(page.files);

            match page.next_page_token {
                Some(token) => current.page_token = Some(token),
                None => break,
            }
        }

        Ok(files)
    }

    /// Gets file metadata.
    pub async fn get(&self, file_id: &str, params: &GetFileParams) -> DriveResult<DriveFile> {
        let path = Self::file_path(file_id)?;
        self.executor.get_json(&path, Some(params)).await
    }

    /// Downloads a file's stored bytes without conversion.
    pub async fn download(&self, file_id: &str) -> DriveResult<ByteStream> {
        let path = Self::file_path(file_id)?;
        self.executor
            .get_stream(&path, Some(&MediaParams { alt: "media" }))
            .await
    }

    /// Exports a Google Workspace document to `mime_type`.
    pub async fn export(&self, file_id: &str, mime_type: &str) -> DriveResult<ByteStream> {
        let path = format!("{}/export", Self::file_path(file_id)?);
        self.executor
            .get_stream(&path, Some(&ExportParams { mime_type }))
            .await
    }

    fn file_path(file_id: &str) -> DriveResult<String> {
        if file_id.is_empty() {
            return Err(DriveError::Request(RequestError::MissingParameter(
                "file_id is required".to_string(),
            )));
        }
        // A dot segment would be resolved away when joined onto the base URL
        if file_id == "." || file_id == ".." {
            return Err(DriveError::Request(RequestError::InvalidParameter(format!(
                "Invalid file_id '{}'",
                file_id
            ))));
        }
        Ok(format!(
            "files/{}",
            utf8_percent_encode(file_id, PATH_SEGMENT)
        ))
    }
}

//! Type definitions for the Drive API.

use serde::{Deserialize, Serialize};

/// MIME types the Drive API uses for native Workspace documents.
pub mod mime_types {
    /// Google Docs document.
    pub const GOOGLE_DOCUMENT: &str = "application/vnd.google-apps.document";
    /// Google Sheets spreadsheet.
    pub const GOOGLE_SPREADSHEET: &str = "application/vnd.google-apps.spreadsheet";
    /// Google Slides presentation.
    pub const GOOGLE_PRESENTATION: &str = "application/vnd.google-apps.presentation";
    /// Portable Document Format.
    pub const PDF: &str = "application/pdf";
    /// Plain text export target.
    pub const TEXT_PLAIN: &str = "text/plain";
    /// CSV export target.
    pub const TEXT_CSV: &str = "text/csv";
}

/// Drive file metadata, restricted to the fields this service requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID.
    pub id: String,

    /// File name.
    pub name: String,

    /// MIME type.
    #[serde(default)]
    pub mime_type: String,
}

/// File list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    /// Next page token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,

    /// List of files.
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// Parameters for listing files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesParams {
    /// Query string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,

    /// Fields to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,

    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Page token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

impl ListFilesParams {
    /// Parameters selecting the non-trashed children of a folder.
    pub fn children_of(folder_id: &str) -> Self {
        Self {
            q: Some(format!(
                "'{}' in parents and trashed=false",
                escape_query_literal(folder_id)
            )),
            fields: Some("nextPageToken, files(id, name, mimeType)".to_string()),
            page_size: Some(1000),
            ..Default::default()
        }
    }
}

/// Parameters for fetching a single file's metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFileParams {
    /// Fields to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

/// Escapes a value for use inside a single-quoted Drive query literal.
pub fn escape_query_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

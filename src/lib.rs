//! Google Drive connector service.
//!
//! Exposes a read-only HTTP API over a single Drive folder: list the files it
//! contains and fetch any of them as plain text. Native Google Docs, Sheets
//! and Slides are exported by Drive itself; PDFs are run through text
//! extraction; `text/*` files are returned as stored.
//!
//! # Example
//!
//! ```no_run
//! use google_drive_connector::{ConnectorConfig, ContentGateway};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectorConfig::from_env()?;
//! let gateway = ContentGateway::connect(&config).await;
//! for file in gateway.list_files().await? {
//!     println!("{}: {}", file.id, file.name);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod server;
pub mod services;
pub mod transport;
pub mod types;

pub use auth::{AccessToken, AuthProvider, ServiceAccountProvider};
pub use client::DriveClient;
pub use config::{ConnectorConfig, DriveConfig, DriveConfigBuilder};
pub use errors::{ConnectorError, ConnectorResult, DriveError, DriveResult};
pub use gateway::{
    ContentGateway, ContentKind, DriveSource, FileContent, FileInfo, UnauthenticatedSource,
};
pub use types::{DriveFile, FileList, ListFilesParams};

/// Commonly used types in a single import.
///
/// ```no_run
/// use google_drive_connector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{AccessToken, AuthProvider, ServiceAccountKey, ServiceAccountProvider};
    pub use crate::client::DriveClient;
    pub use crate::config::{ConnectorConfig, DriveConfig, DriveConfigBuilder};
    pub use crate::errors::{ConnectorError, ConnectorResult, DriveError, DriveResult};
    pub use crate::gateway::{ContentGateway, ContentKind, DriveSource, FileContent, FileInfo};
    pub use crate::services::FilesService;
    pub use crate::types::{DriveFile, FileList, GetFileParams, ListFilesParams};
}

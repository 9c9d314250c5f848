use super::dto::{HealthResponse, MessageResponse};
use super::error::ApiError;
use crate::gateway::{ContentGateway, FileContent, FileInfo};
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

pub const SERVICE_NAME: &str = "google-drive-connector";

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Google Drive ChatGPT Connector is running".to_string(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
    })
}

/// Every listing failure is reported as an internal error.
pub async fn list_files(
    State(gateway): State<Arc<ContentGateway>>,
) -> Result<Json<Vec<FileInfo>>, ApiError> {
    gateway
        .list_files()
        .await
        .map(Json)
        .map_err(ApiError::internal)
}

pub async fn get_file(
    State(gateway): State<Arc<ContentGateway>>,
    Path(file_id): Path<String>,
) -> Result<Json<FileContent>, ApiError> {
    gateway
        .get_file_content(&file_id)
        .await
        .map(Json)
        .map_err(ApiError::from_connector)
}

use super::dto::ErrorResponse;
use crate::errors::ConnectorError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

/// A failed request, rendered as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    /// Reports `err` with the status it classifies itself as.
    pub fn from_connector(err: ConnectorError) -> Self {
        Self {
            status: err.status_code(),
            detail: err.to_string(),
        }
    }

    /// Reports `err` as an internal error regardless of its kind.
    pub fn internal(err: ConnectorError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(status = %self.status, detail = %self.detail, "Request failed");
        (
            self.status,
            Json(ErrorResponse {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

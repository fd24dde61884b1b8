//! API error type and its JSON response mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use ayulink_core::error::StorageError;

/// Errors returned by the HTTP handlers as `{"error": "..."}` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file part")]
    NoFilePart,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("File type not allowed")]
    FileTypeNotAllowed,

    #[error("Failed to read upload: {0}")]
    InvalidUpload(String),

    #[error("Result not found")]
    ResultNotFound,

    #[error("File not found")]
    UploadNotFound,

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoFilePart
            | ApiError::NoSelectedFile
            | ApiError::FileTypeNotAllowed
            | ApiError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            ApiError::ResultNotFound | ApiError::UploadNotFound => StatusCode::NOT_FOUND,
            ApiError::Processing(_) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

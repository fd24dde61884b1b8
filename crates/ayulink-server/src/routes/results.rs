//! Retrieval of stored results and uploads.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use ayulink_core::error::StorageError;
use ayulink_core::OcrReport;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /results/:filename
pub async fn get_result(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<OcrReport>, ApiError> {
    match state.store().load_result(&filename) {
        Ok(report) => Ok(Json(report)),
        Err(StorageError::NotFound(_)) => Err(ApiError::ResultNotFound),
        Err(e) => Err(e.into()),
    }
}

/// GET /uploads/:filename
pub async fn get_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let path = match state.store().upload_path(&filename) {
        Ok(path) => path,
        Err(StorageError::NotFound(_)) => return Err(ApiError::UploadNotFound),
        Err(e) => return Err(e.into()),
    };

    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::Storage(StorageError::Io(e)))?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.to_string())], data))
}

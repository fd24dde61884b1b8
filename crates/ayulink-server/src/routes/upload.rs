//! File intake: store the upload, run OCR, persist and return the report.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use ayulink_core::OcrReport;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of a successful upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    pub result_file: String,
    pub ocr_result: OcrReport,
}

/// POST /upload
///
/// Expects multipart form data with a `file` field.
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Upload without multipart body: {}", e);
        ApiError::NoFilePart
    })?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or(ApiError::NoFilePart)?;
    if filename.is_empty() {
        return Err(ApiError::NoSelectedFile);
    }
    if !state.store().is_allowed(&filename) {
        return Err(ApiError::FileTypeNotAllowed);
    }

    let path = state.store().save_upload(&filename, &data)?;
    let stored_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.clone());

    tracing::info!(filename = %stored_name, bytes = data.len(), "Upload stored");

    let processor = state.processor();
    let report = tokio::task::spawn_blocking(move || processor.process_file(&path))
        .await
        .map_err(|e| ApiError::Processing(e.to_string()))?
        .map_err(|e| ApiError::Processing(e.to_string()))?;

    let result_file = state.store().save_result(&stored_name, &report)?;

    tracing::info!(
        filename = %stored_name,
        result_file = %result_file,
        success = report.success,
        pairs = report.key_value_pairs.len(),
        "Upload processed"
    );

    Ok(Json(UploadResponse {
        message: "File processed successfully".to_string(),
        filename: stored_name,
        result_file,
        ocr_result: report,
    }))
}

use crate::constants::{UPLOAD_STATUS_OK, UPLOAD_SUCCESS_MESSAGE};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap},
    Json,
};
use filedrop_core::AppError;
use filedrop_storage::{content_type_for, DEFAULT_CONTENT_TYPE};
use futures::TryStreamExt;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::io::StreamReader;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub status: String,
    pub message: String,
    /// Object keys of the stored files, in upload order
    pub links: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    request_body(
        content_type = "multipart/form-data",
        description = "One or more files in the configured form field (default `FileUploadKey`)"
    ),
    responses(
        (status = 200, description = "Files stored", body = UploadResponse),
        (status = 400, description = "Malformed multipart body or no files", body = ErrorResponse),
        (status = 413, description = "Request body exceeds the upload limit", body = ErrorResponse),
        (status = 502, description = "Object store rejected the write", body = ErrorResponse),
        (status = 503, description = "Storage client unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, multipart), fields(operation = "upload_files"))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let max_size = state.config.max_upload_size_bytes();
    check_declared_length(&headers, max_size)?;

    let field_name = state.config.upload_field_name();
    let start = std::time::Instant::now();
    let mut links = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            tracing::debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .map(String::from)
            .or_else(|| content_type_for(&filename).map(String::from))
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let key = state.keys.derive(&filename)?;
        let storage = state.storage().await?;

        let mut reader = Box::pin(StreamReader::new(field.map_err(std::io::Error::other)));
        let size = storage.put_stream(&key, &content_type, &mut reader).await?;

        tracing::info!(
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            "File stored"
        );
        links.push(key);
    }

    if links.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "No files found in form field '{}'",
            field_name
        ))
        .into());
    }

    tracing::info!(
        files = links.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Upload complete"
    );

    Ok(Json(UploadResponse {
        status: UPLOAD_STATUS_OK.to_string(),
        message: UPLOAD_SUCCESS_MESSAGE.to_string(),
        links,
    }))
}

/// Reject a request whose declared body length already exceeds the limit.
fn check_declared_length(headers: &HeaderMap, max_size: usize) -> Result<(), AppError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    match declared {
        Some(length) if length > max_size as u64 => Err(AppError::PayloadTooLarge(format!(
            "Request body of {} bytes exceeds the {} byte limit",
            length, max_size
        ))),
        _ => Ok(()),
    }
}

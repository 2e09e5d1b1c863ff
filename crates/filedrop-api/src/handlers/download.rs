use crate::constants::{CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, Response, StatusCode},
    response::IntoResponse,
};
use bytes::Bytes;
use filedrop_core::AppError;
use flate2::{write::GzEncoder, Compression};
use std::io::Write;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/file/{dir}/{filename}",
    tag = "files",
    params(
        ("dir" = String, Path, description = "Date partition of the object key (MM-DD-YYYY)"),
        ("filename" = String, Path, description = "Last segment of the object key")
    ),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid path", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 502, description = "Object store read failed", body = ErrorResponse),
        (status = 503, description = "Storage client unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers), fields(operation = "download_file"))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path((dir, filename)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpAppError> {
    validate_segment(&dir)?;
    validate_segment(&filename)?;
    let key = format!("{}/{}", dir, filename);

    let storage = state.storage().await?;
    let object = storage.get(&key).await?;

    let gzip = state.config.gzip_downloads() && accepts_gzip(&headers);
    let body = if gzip {
        gzip_bytes(object.data).await?
    } else {
        object.data
    };

    tracing::debug!(
        key = %key,
        content_type = %object.content_type,
        size_bytes = object.size,
        sent_bytes = body.len(),
        gzip,
        "Serving file"
    );

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, object.content_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&object.content_type, &filename),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, CORS_ALLOW_ORIGIN)
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, CORS_ALLOW_METHODS);

    if gzip {
        response = response
            .header(header::CONTENT_ENCODING, "gzip")
            .header(header::VARY, "Accept-Encoding");
    }

    let response = response
        .body(Body::from(body))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// CORS preflight for downloads.
#[utoipa::path(
    options,
    path = "/file/{dir}/{filename}",
    tag = "files",
    params(
        ("dir" = String, Path, description = "Date partition of the object key"),
        ("filename" = String, Path, description = "Last segment of the object key")
    ),
    responses((status = 204, description = "CORS preflight accepted"))
)]
pub async fn download_options() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, CORS_ALLOW_ORIGIN),
            (header::ACCESS_CONTROL_ALLOW_METHODS, CORS_ALLOW_METHODS),
        ],
    )
}

/// `inline` for content browsers render themselves (images, PDFs), otherwise
/// `attachment`.
pub fn disposition_for(content_type: &str) -> &'static str {
    if content_type.contains("image") || content_type.contains("pdf") {
        "inline"
    } else {
        "attachment"
    }
}

fn content_disposition(content_type: &str, filename: &str) -> String {
    format!("{}; filename={}", disposition_for(content_type), filename)
}

fn validate_segment(segment: &str) -> Result<(), AppError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\'])
        || segment.chars().any(char::is_control)
    {
        return Err(AppError::InvalidInput(format!(
            "Invalid path segment: {:?}",
            segment
        )));
    }
    Ok(())
}

/// Whether the client's `Accept-Encoding` admits gzip with a non-zero weight.
fn accepts_gzip(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT_ENCODING)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|coding| {
            let mut parts = coding.split(';');
            let name = parts.next().unwrap_or("").trim();
            let rejected = parts.any(|param| {
                let param = param.trim();
                param
                    .strip_prefix("q=")
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .is_some_and(|q| q <= 0.0)
            });
            (name.eq_ignore_ascii_case("gzip") || name == "*") && !rejected
        })
}

async fn gzip_bytes(data: Bytes) -> Result<Bytes, AppError> {
    tokio::task::spawn_blocking(move || {
        let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
        encoder.write_all(&data)?;
        encoder.finish().map(Bytes::from)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Compression task failed: {}", e)))?
    .map_err(|e| AppError::Internal(format!("Failed to compress file: {}", e)))
}

//! Request helpers shared by the integration tests.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};

pub const FIELD: &str = "FileUploadKey";

/// A file part for a multipart form.
pub fn file_part(filename: &str, mime: &str, data: &[u8]) -> Part {
    Part::bytes(bytes::Bytes::copy_from_slice(data))
        .file_name(filename)
        .mime_type(mime)
}

/// POST `/upload` with one file in the default field.
pub async fn upload_one(
    client: &TestServer,
    filename: &str,
    mime: &str,
    data: &[u8],
) -> TestResponse {
    let form = MultipartForm::new().add_part(FIELD, file_part(filename, mime, data));
    client.post("/upload").multipart(form).await
}

/// Upload one file, assert success and return its object key.
pub async fn upload_and_get_key(
    client: &TestServer,
    filename: &str,
    mime: &str,
    data: &[u8],
) -> String {
    let response = upload_one(client, filename, mime, data).await;
    assert_eq!(response.status_code(), 200, "upload failed: {}", response.text());

    let body: serde_json::Value = response.json();
    body["links"][0]
        .as_str()
        .expect("Expected a key in upload response links")
        .to_string()
}

/// URL of the download route for an object key.
pub fn file_url(key: &str) -> String {
    format!("/file/{}", key)
}

/// Last path segment of an object key.
pub fn key_filename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

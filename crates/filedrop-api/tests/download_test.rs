//! Download API integration tests.
//!
//! Run with: `cargo test -p filedrop-api --test download_test`

mod helpers;

use axum::http::Method;
use flate2::read::GzDecoder;
use helpers::workflows::{file_url, key_filename, upload_and_get_key};
use helpers::{setup_test_app, setup_test_app_with};
use std::io::Read;

fn header<'a>(response: &'a axum_test::TestResponse, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn test_round_trip_returns_identical_bytes() {
    let app = setup_test_app().await;
    let client = app.client();

    let data: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
    let key = upload_and_get_key(client, "blob.bin", "application/octet-stream", &data).await;

    let response = client.get(&file_url(&key)).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().as_ref(), data.as_slice());
    assert_eq!(header(&response, "content-type"), Some("application/octet-stream"));
    assert_eq!(header(&response, "content-length"), Some("70000"));
    assert!(header(&response, "content-encoding").is_none());
}

#[tokio::test]
async fn test_text_file_is_attachment_named_after_key() {
    let app = setup_test_app().await;
    let client = app.client();

    let key = upload_and_get_key(client, "a.txt", "text/plain", b"plain text").await;
    let filename = key_filename(&key);

    let response = client.get(&file_url(&key)).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().as_ref(), b"plain text");
    assert_eq!(header(&response, "content-type"), Some("text/plain"));
    assert_eq!(
        header(&response, "content-disposition"),
        Some(format!("attachment; filename={}", filename).as_str())
    );
}

#[tokio::test]
async fn test_images_and_pdfs_are_inline() {
    let app = setup_test_app().await;
    let client = app.client();

    for (name, mime) in [("photo.png", "image/png"), ("doc.pdf", "application/pdf")] {
        let key = upload_and_get_key(client, name, mime, b"binary").await;
        let response = client.get(&file_url(&key)).await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(header(&response, "content-type"), Some(mime));
        let disposition = header(&response, "content-disposition").unwrap();
        assert!(disposition.starts_with("inline; filename="), "{}", disposition);
    }
}

#[tokio::test]
async fn test_cors_headers_on_download_and_preflight() {
    let app = setup_test_app().await;
    let client = app.client();

    let key = upload_and_get_key(client, "a.txt", "text/plain", b"x").await;
    let response = client.get(&file_url(&key)).await;
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    assert_eq!(
        header(&response, "access-control-allow-methods"),
        Some("POST, GET, OPTIONS, PUT, DELETE")
    );

    let preflight = client.method(Method::OPTIONS, &file_url(&key)).await;
    assert_eq!(preflight.status_code(), 204);
    assert_eq!(header(&preflight, "access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/file/01-01-2024/missing.txt").await;

    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_encoded_separators_and_control_chars_are_rejected() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/file/01-01-2024/..%2F..%2Fsecret").await;
    assert_eq!(response.status_code(), 400);

    let response = client.get("/file/01-01-2024/a%00b").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_gzip_when_client_accepts_it() {
    let app = setup_test_app().await;
    let client = app.client();

    let data = "compress me ".repeat(1000);
    let key = upload_and_get_key(client, "big.txt", "text/plain", data.as_bytes()).await;

    let response = client
        .get(&file_url(&key))
        .add_header("Accept-Encoding", "gzip, deflate")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(header(&response, "content-encoding"), Some("gzip"));
    assert_eq!(header(&response, "vary"), Some("Accept-Encoding"));

    let body = response.as_bytes();
    let declared: usize = header(&response, "content-length").unwrap().parse().unwrap();
    assert_eq!(declared, body.len());
    assert!(body.len() < data.len());

    let mut decoded = String::new();
    GzDecoder::new(body.as_ref())
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, data);
}

#[tokio::test]
async fn test_gzip_disabled_by_config_sends_raw_bytes() {
    let app = setup_test_app_with(&[("DOWNLOAD_GZIP_ENABLED", "false")]).await;
    let client = app.client();

    let key = upload_and_get_key(client, "a.txt", "text/plain", b"raw bytes").await;
    let response = client
        .get(&file_url(&key))
        .add_header("Accept-Encoding", "gzip")
        .await;

    assert_eq!(response.status_code(), 200);
    assert!(header(&response, "content-encoding").is_none());
    assert_eq!(response.as_bytes().as_ref(), b"raw bytes");
    assert_eq!(header(&response, "content-length"), Some("9"));
}

//! HTTP-level constants shared by the handlers.

/// Service version reported by `/health` and the OpenAPI document.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CORS headers sent with downloads and preflight responses.
pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";

/// Success values of the upload response body.
pub const UPLOAD_STATUS_OK: &str = "OK";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Files Uploaded Successfully";

//! Configuration module
//!
//! Configuration is read once at startup from the process environment (after
//! loading an optional `.env` file) and handed to the storage factory and the
//! router. Nothing reads the environment after `Config::from_env` returns.

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 8080;
const MAX_UPLOAD_SIZE_MB: usize = 100;
const REQUEST_TIMEOUT_SECS: u64 = 300;
const UPLOAD_FIELD_NAME: &str = "FileUploadKey";
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Server-wide settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub request_timeout_secs: u64,
    /// Maximum number of requests served at once
    pub http_concurrency_limit: usize,
    /// `compact` or `json`
    pub log_format: String,
}

/// Object store settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub gcs_bucket: Option<String>,
    /// Service account key JSON. When unset the GCS client falls back to
    /// `GOOGLE_SERVICE_ACCOUNT` / application default credentials.
    pub gcs_service_account_key: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
}

/// Upload and download behaviour
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub max_upload_size_bytes: usize,
    /// Multipart field name carrying the files
    pub field_name: String,
    pub gzip_downloads: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";

        let base = BaseConfig {
            server_port: match lookup("PORT") {
                Some(port) => port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => SERVER_PORT,
            },
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(REQUEST_TIMEOUT_SECS)
                .max(1),
            http_concurrency_limit: lookup("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            log_format: lookup("LOG_FORMAT")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|| {
                    if is_production {
                        "json".to_string()
                    } else {
                        "compact".to_string()
                    }
                }),
            environment,
        };

        let backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::Gcs,
        };

        let storage = StorageConfig {
            backend,
            gcs_bucket: non_empty(lookup("GCS_BUCKET")),
            gcs_service_account_key: non_empty(lookup("GCS_SERVICE_ACCOUNT_KEY")),
            s3_bucket: non_empty(lookup("S3_BUCKET")),
            s3_region: non_empty(lookup("S3_REGION")),
            s3_endpoint: non_empty(lookup("S3_ENDPOINT")),
            aws_region: non_empty(lookup("AWS_REGION")),
            local_storage_path: non_empty(lookup("LOCAL_STORAGE_PATH")),
        };

        let max_upload_size_mb = lookup("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "MAX_UPLOAD_SIZE_MB is too large: {} MB overflows the byte limit",
                    max_upload_size_mb
                )
            })?;

        let upload = UploadConfig {
            max_upload_size_bytes,
            field_name: non_empty(lookup("UPLOAD_FIELD_NAME"))
                .unwrap_or_else(|| UPLOAD_FIELD_NAME.to_string()),
            gzip_downloads: lookup("DOWNLOAD_GZIP_ENABLED")
                .map(|s| s.to_lowercase())
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        };

        let config = Config {
            base,
            storage,
            upload,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if !matches!(self.base.log_format.as_str(), "compact" | "json") {
            return Err(anyhow::anyhow!(
                "LOG_FORMAT must be 'compact' or 'json', got '{}'",
                self.base.log_format
            ));
        }

        match self.storage.backend {
            StorageBackend::Gcs => {
                if self.storage.gcs_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "GCS_BUCKET must be set when using GCS storage backend"
                    ));
                }
            }
            StorageBackend::S3 => {
                if self.storage.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.storage.s3_region.is_none() && self.storage.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.storage.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {}
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.base.request_timeout_secs
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.base.http_concurrency_limit
    }

    pub fn log_format(&self) -> &str {
        &self.base.log_format
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend
    }

    pub fn gcs_bucket(&self) -> Option<&str> {
        self.storage.gcs_bucket.as_deref()
    }

    pub fn gcs_service_account_key(&self) -> Option<&str> {
        self.storage.gcs_service_account_key.as_deref()
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.storage.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.storage.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.storage.s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.storage.aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.storage.local_storage_path.as_deref()
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.upload.max_upload_size_bytes
    }

    pub fn upload_field_name(&self) -> &str {
        &self.upload.field_name
    }

    pub fn gzip_downloads(&self) -> bool {
        self.upload.gzip_downloads
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

//! Filedrop Storage Library
//!
//! This crate provides the storage abstraction used by the upload and
//! download endpoints: the `Storage` trait, its backends (any `object_store`
//! store such as GCS or S3, and the local filesystem), the lazily initialized
//! `StorageProvider`, and object key derivation.
//!
//! # Object key format
//!
//! Uploaded files are stored under a date partition:
//!
//! `<MM-DD-YYYY>/<filename><nanos>_<filename>`
//!
//! Key generation is centralized in the `keys` module.

pub mod content_type;
pub mod factory;
pub mod keys;
pub mod local;
pub mod object;
pub mod provider;
pub mod traits;
mod transfer;

// Re-export commonly used types
pub use content_type::{content_type_for, DEFAULT_CONTENT_TYPE};
pub use factory::{create_storage, storage_provider};
pub use filedrop_core::StorageBackend;
pub use keys::{sanitize_filename, KeyDeriver};
pub use local::LocalStorage;
pub use object::ObjectStorage;
pub use provider::StorageProvider;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};

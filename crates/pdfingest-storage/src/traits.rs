//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use pdfingest_core::AppError;
use thiserror::Error;

/// Content type recorded on every uploaded object.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Where an uploaded object ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Backend-internal key, recorded as the document's `storage_path`
    pub key: String,
    /// Address clients can use to reach the object
    pub url: String,
}

/// Storage abstraction trait
///
/// The upload pipeline only writes objects under precomputed keys. `verify_access`
/// runs once at startup so a missing bucket or directory fails the process instead
/// of the first upload.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `storage_key` and return where it landed.
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<StoredObject>;

    /// Check that the bucket or root directory is reachable.
    async fn verify_access(&self) -> StorageResult<()>;

    /// Get the backend type
    fn backend_type(&self) -> StorageBackend;
}

//! pdfingest storage library
//!
//! Object storage for uploaded PDFs. The `Storage` trait is implemented for S3 (and
//! S3-compatible providers such as MinIO) and for the local filesystem.
//!
//! # Storage key format
//!
//! Every backend stores objects under the same tenant-scoped layout:
//!
//! `{tenant_name}/{YYYY}/{MM}/{DD}/{uuid}{ext}`
//!
//! The date is the UTC upload date and the uuid is a time-ordered v7 id, so keys are
//! unique and sort by upload time within a tenant prefix. Keys must not contain `..` or
//! a leading `/`. Key generation lives in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::generate_storage_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use pdfingest_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject, PDF_CONTENT_TYPE};

//! pdfingest core library
//!
//! Domain models, the shared error taxonomy, configuration and the pure validators
//! used by every other pdfingest crate.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IngestConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;

//! Storage setup and initialization

use anyhow::{Context, Result};
use pdfingest_core::Config;
use pdfingest_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing object storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize object storage")?;
    ensure_storage_ready(storage.as_ref()).await?;
    tracing::info!(
        backend = ?storage.backend_type(),
        bucket = ?config.s3_bucket(),
        "Object storage initialized"
    );
    Ok(storage)
}

/// Fail startup when the bucket or storage directory cannot be reached.
pub async fn ensure_storage_ready(storage: &dyn Storage) -> Result<()> {
    storage.verify_access().await.with_context(|| {
        format!(
            "Object storage ({:?}) is not ready; check the bucket exists and credentials are valid",
            storage.backend_type()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfingest_services::services::testing::InMemoryStorage;

    #[tokio::test]
    async fn test_ready_storage_passes() {
        let storage = InMemoryStorage::new();
        ensure_storage_ready(&storage).await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_storage_fails_startup() {
        let storage = InMemoryStorage::new();
        storage.fail_puts(true);

        let err = ensure_storage_ready(&storage).await.unwrap_err();
        assert!(err.to_string().contains("is not ready"));
        assert!(format!("{:#}", err).contains("bucket unavailable"));
    }
}

use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating `base_path` if needed.
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/pdfingest/uploads")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8080/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path, rejecting keys that would escape the
    /// storage root.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains("..")
            || storage_key.starts_with('/')
            || storage_key.contains('\\')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(storage_key);
        if path.strip_prefix(&self.base_path).is_err() {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(path)
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<StoredObject> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredObject {
            key: storage_key.to_string(),
            url: self.generate_url(storage_key),
        })
    }

    async fn verify_access(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.base_path).await.map_err(|e| {
            StorageError::Unavailable(format!(
                "storage directory {} is not reachable: {}",
                self.base_path.display(),
                e
            ))
        })?;
        if !metadata.is_dir() {
            return Err(StorageError::Unavailable(format!(
                "storage path {} is not a directory",
                self.base_path.display()
            )));
        }
        if metadata.permissions().readonly() {
            return Err(StorageError::Unavailable(format!(
                "storage directory {} is read-only",
                self.base_path.display()
            )));
        }
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use crate::keys::generate_storage_key;
    use crate::PDF_CONTENT_TYPE;
    use chrono::Utc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_storage_put_writes_file() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8080/files/".to_string())
            .await
            .unwrap();

        let key = generate_storage_key("acme_test", "sample.pdf", Utc::now());
        let data = Bytes::from_static(b"%PDF-1.4 test");

        let stored = storage
            .put(&key, data.clone(), PDF_CONTENT_TYPE)
            .await
            .unwrap();

        assert_eq!(stored.key, key);
        assert_eq!(stored.url, format!("http://localhost:8080/files/{}", key));
        let on_disk = std::fs::read(dir.path().join(&key)).unwrap();
        assert_eq!(on_disk, &data[..]);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8080/files".to_string())
            .await
            .unwrap();

        let result = storage
            .put("../escape.pdf", Bytes::from_static(b"x"), PDF_CONTENT_TYPE)
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage
            .put("/etc/passwd", Bytes::from_static(b"x"), PDF_CONTENT_TYPE)
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_verify_access() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("uploads");
        let storage = LocalStorage::new(&root, "http://localhost:8080/files".to_string())
            .await
            .unwrap();
        storage.verify_access().await.unwrap();

        std::fs::remove_dir_all(&root).unwrap();
        let err = storage.verify_access().await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(err.to_string().contains("not reachable"));

        std::fs::write(&root, b"not a directory").unwrap();
        let err = storage.verify_access().await.unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[tokio::test]
    async fn test_new_creates_base_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested/uploads");
        let storage = LocalStorage::new(&nested, "http://localhost/files".to_string())
            .await
            .unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }
}

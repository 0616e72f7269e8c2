//! In-memory implementations of the registry, document store, object store,
//! extractor and summary clients, for service and HTTP tests.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use pdfingest_core::models::{Document, NewDocument, NewTenant, Tenant, TenantStatus};
use pdfingest_core::AppError;
use pdfingest_db::{TenantDocumentStore, TenantRegistry};
use pdfingest_storage::{Storage, StorageBackend, StorageError, StorageResult, StoredObject};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::extraction::TextExtraction;
use super::summarization::SummaryClient;

#[derive(Default)]
pub struct InMemoryTenantRegistry {
    rows: Mutex<Vec<Tenant>>,
    next_id: AtomicI32,
}

impl InMemoryTenantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, tenant_name: &str) -> Option<Tenant> {
        self.rows
            .lock()
            .await
            .iter()
            .find(|t| t.tenant_name == tenant_name)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }
}

#[async_trait]
impl TenantRegistry for InMemoryTenantRegistry {
    async fn find_active(&self, tenant_name: &str) -> Result<Option<Tenant>, AppError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|t| t.tenant_name == tenant_name && !t.is_deleted)
            .cloned())
    }

    async fn insert(&self, tenant: &NewTenant) -> Result<Tenant, AppError> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|t| t.tenant_name == tenant.tenant_name) {
            return Err(AppError::Conflict(format!(
                "tenant '{}' already exists",
                tenant.tenant_name
            )));
        }

        let now = Utc::now();
        let row = Tenant {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            tenant_name: tenant.tenant_name.clone(),
            db_host: tenant.db_host.clone(),
            db_port: tenant.db_port,
            db_name: tenant.db_name.clone(),
            status: TenantStatus::Active,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn mark_deleted(&self, tenant_name: &str) -> Result<(), AppError> {
        let mut rows = self.rows.lock().await;
        match rows
            .iter_mut()
            .find(|t| t.tenant_name == tenant_name && !t.is_deleted)
        {
            Some(row) => {
                let now = Utc::now();
                row.status = TenantStatus::Deleted;
                row.is_deleted = true;
                row.deleted_at = Some(now);
                row.updated_at = now;
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "tenant '{}' not found or already deleted",
                tenant_name
            ))),
        }
    }

    async fn mark_restored(&self, tenant_name: &str) -> Result<(), AppError> {
        let mut rows = self.rows.lock().await;
        match rows
            .iter_mut()
            .find(|t| t.tenant_name == tenant_name && t.is_deleted)
        {
            Some(row) => {
                row.status = TenantStatus::Active;
                row.is_deleted = false;
                row.deleted_at = None;
                row.updated_at = Utc::now();
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "tenant '{}' not found or not deleted",
                tenant_name
            ))),
        }
    }

    async fn list_active(&self) -> Result<Vec<Tenant>, AppError> {
        let mut active: Vec<Tenant> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|t| !t.is_deleted)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(active)
    }

    async fn list_deleted(&self) -> Result<Vec<Tenant>, AppError> {
        let mut deleted: Vec<Tenant> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|t| t.is_deleted)
            .cloned()
            .collect();
        deleted.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at).then(b.id.cmp(&a.id)));
        Ok(deleted)
    }
}

#[derive(Default)]
pub struct InMemoryDocumentStore {
    stores: Mutex<HashSet<String>>,
    documents: Mutex<HashMap<String, Vec<Document>>>,
    fail_inserts: AtomicBool,
    fail_provisioning: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_provisioning(&self, fail: bool) {
        self.fail_provisioning.store(fail, Ordering::SeqCst);
    }

    /// Every document of a tenant, deleted or not.
    pub async fn documents(&self, tenant_name: &str) -> Vec<Document> {
        self.documents
            .lock()
            .await
            .get(tenant_name)
            .cloned()
            .unwrap_or_default()
    }

    async fn require_store(&self, tenant_name: &str) -> Result<(), AppError> {
        if self.stores.lock().await.contains(tenant_name) {
            Ok(())
        } else {
            Err(AppError::Internal(format!(
                "document store for '{}' does not exist",
                tenant_name
            )))
        }
    }
}

#[async_trait]
impl TenantDocumentStore for InMemoryDocumentStore {
    async fn provision(&self, tenant_name: &str) -> Result<(), AppError> {
        if self.fail_provisioning.load(Ordering::SeqCst) {
            return Err(AppError::Internal("provisioning unavailable".to_string()));
        }
        self.stores.lock().await.insert(tenant_name.to_string());
        Ok(())
    }

    async fn insert_document(&self, document: &NewDocument) -> Result<Document, AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Internal("document store unavailable".to_string()));
        }
        self.require_store(&document.tenant_name).await?;

        let row = Document {
            id: Uuid::new_v4(),
            tenant_name: document.tenant_name.clone(),
            file_name: document.file_name.clone(),
            file_size: document.file_size,
            storage_path: document.storage_path.clone(),
            storage_url: document.storage_url.clone(),
            extracted_text: document.extracted_text.clone(),
            summary: document.summary.clone(),
            uploaded_at: document.uploaded_at,
            is_deleted: false,
            deleted_at: None,
        };
        self.documents
            .lock()
            .await
            .entry(document.tenant_name.clone())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn soft_delete_all(&self, tenant_name: &str) -> Result<u64, AppError> {
        self.require_store(tenant_name).await?;
        let now = Utc::now();
        let mut documents = self.documents.lock().await;
        let mut count = 0;
        for doc in documents.entry(tenant_name.to_string()).or_default() {
            if !doc.is_deleted {
                doc.is_deleted = true;
                doc.deleted_at = Some(now);
                count += 1;
            }
        }
        Ok(count)
    }

    async fn restore_all(&self, tenant_name: &str) -> Result<u64, AppError> {
        self.require_store(tenant_name).await?;
        let mut documents = self.documents.lock().await;
        let mut count = 0;
        for doc in documents.entry(tenant_name.to_string()).or_default() {
            if doc.is_deleted {
                doc.is_deleted = false;
                doc.deleted_at = None;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn count_documents(&self, tenant_name: &str) -> Result<i64, AppError> {
        self.require_store(tenant_name).await?;
        Ok(self
            .documents(tenant_name)
            .await
            .iter()
            .filter(|d| !d.is_deleted)
            .count() as i64)
    }

    async fn count_deleted_documents(&self, tenant_name: &str) -> Result<i64, AppError> {
        self.require_store(tenant_name).await?;
        Ok(self
            .documents(tenant_name)
            .await
            .iter()
            .filter(|d| d.is_deleted)
            .count() as i64)
    }

    async fn store_exists(&self, tenant_name: &str) -> Result<bool, AppError> {
        Ok(self.stores.lock().await.contains(tenant_name))
    }

    async fn drop_store(&self, tenant_name: &str) -> Result<(), AppError> {
        self.stores.lock().await.remove(tenant_name);
        self.documents.lock().await.remove(tenant_name);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<String, Bytes>>,
    fail_puts: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make puts and access checks fail as if the bucket were gone.
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.lock().await.keys().cloned().collect()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<StoredObject> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("bucket unavailable".to_string()));
        }
        self.objects
            .lock()
            .await
            .insert(storage_key.to_string(), data);
        Ok(StoredObject {
            key: storage_key.to_string(),
            url: format!("memory://pdf-uploads/{}", storage_key),
        })
    }

    async fn verify_access(&self) -> StorageResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("bucket unavailable".to_string()));
        }
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Extractor returning the same text for every file.
pub struct FixedTextExtractor(pub String);

#[async_trait]
impl TextExtraction for FixedTextExtractor {
    async fn extract(&self, _file_name: &str, _data: Bytes) -> String {
        self.0.clone()
    }
}

/// Summary client that always errors.
pub struct FailingSummaryClient;

#[async_trait]
impl SummaryClient for FailingSummaryClient {
    async fn summarize(&self, _text: &str) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("provider unavailable"))
    }
}

/// Summary client that answers only after the given delay.
pub struct SlowSummaryClient(pub Duration);

#[async_trait]
impl SummaryClient for SlowSummaryClient {
    async fn summarize(&self, _text: &str) -> anyhow::Result<String> {
        tokio::time::sleep(self.0).await;
        Ok("late summary".to_string())
    }
}

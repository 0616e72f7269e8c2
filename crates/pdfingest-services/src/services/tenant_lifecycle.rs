//! Tenant provisioning and lifecycle.
//!
//! The registry and the per-tenant document stores fail independently and never share
//! a transaction. Ordering keeps every intermediate state re-runnable: delete marks
//! documents before the registry row, restore flips the registry row before the
//! documents, and creation provisions the store before registering the tenant.

use pdfingest_core::models::{NewTenant, Tenant, TenantDeleteResponse, TenantRestoreResponse};
use pdfingest_core::validation;
use pdfingest_core::AppError;
use pdfingest_db::{TenantDocumentStore, TenantRegistry};
use std::sync::Arc;

#[derive(Clone)]
pub struct TenantService {
    registry: Arc<dyn TenantRegistry>,
    documents: Arc<dyn TenantDocumentStore>,
    db_host: String,
    db_port: i32,
}

impl TenantService {
    /// `db_host`/`db_port` are recorded on new registry rows as the routing info of
    /// their document store.
    pub fn new(
        registry: Arc<dyn TenantRegistry>,
        documents: Arc<dyn TenantDocumentStore>,
        db_host: String,
        db_port: i32,
    ) -> Self {
        Self {
            registry,
            documents,
            db_host,
            db_port,
        }
    }

    pub fn documents(&self) -> &Arc<dyn TenantDocumentStore> {
        &self.documents
    }

    pub fn validate_tenant_name(name: &str) -> Result<(), AppError> {
        validation::validate_tenant_name(name).map_err(AppError::from)
    }

    /// Active tenant for `name`, provisioning its store and registering it on first
    /// contact. `name` must already be validated.
    #[tracing::instrument(skip(self))]
    pub async fn get_or_create_tenant(&self, name: &str) -> Result<Tenant, AppError> {
        if let Some(tenant) = self.registry.find_active(name).await? {
            return Ok(tenant);
        }

        self.documents.provision(name).await?;

        let new_tenant = NewTenant::new(name, &self.db_host, self.db_port);
        match self.registry.insert(&new_tenant).await {
            Ok(tenant) => {
                tracing::info!(tenant_name = %name, db_name = %tenant.db_name, "Tenant created");
                Ok(tenant)
            }
            Err(AppError::Conflict(_)) => {
                // Lost a creation race, or the name belongs to a soft-deleted tenant.
                match self.registry.find_active(name).await? {
                    Some(tenant) => {
                        tracing::debug!(tenant_name = %name, "Tenant created concurrently, using existing row");
                        Ok(tenant)
                    }
                    None => {
                        tracing::warn!(tenant_name = %name, "Upload to soft-deleted tenant rejected");
                        Err(AppError::Conflict(format!(
                            "tenant '{}' is deleted; restore it before uploading",
                            name
                        )))
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Soft-delete a tenant and all of its documents. Object-store blobs are kept.
    #[tracing::instrument(skip(self))]
    pub async fn delete_tenant(&self, name: &str) -> Result<TenantDeleteResponse, AppError> {
        if self.registry.find_active(name).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "tenant '{}' not found or already deleted",
                name
            )));
        }

        let documents_marked = self.documents.soft_delete_all(name).await?;
        self.registry.mark_deleted(name).await?;

        tracing::info!(
            tenant_name = %name,
            documents_marked_deleted = documents_marked,
            "Tenant soft deleted"
        );

        Ok(TenantDeleteResponse::new(name, documents_marked))
    }

    /// Undo a soft delete. Also finishes a restore that stopped after the registry row
    /// was flipped but before the documents were unmarked.
    #[tracing::instrument(skip(self))]
    pub async fn restore_tenant(&self, name: &str) -> Result<TenantRestoreResponse, AppError> {
        match self.registry.mark_restored(name).await {
            Ok(()) => {}
            Err(AppError::NotFound(msg)) => {
                if !self.has_interrupted_restore(name).await? {
                    return Err(AppError::NotFound(msg));
                }
                tracing::warn!(tenant_name = %name, "Completing interrupted tenant restore");
            }
            Err(e) => return Err(e),
        }

        let documents_restored = self.documents.restore_all(name).await?;

        tracing::info!(
            tenant_name = %name,
            documents_restored = documents_restored,
            "Tenant restored"
        );

        Ok(TenantRestoreResponse::new(name, documents_restored))
    }

    async fn has_interrupted_restore(&self, name: &str) -> Result<bool, AppError> {
        if self.registry.find_active(name).await?.is_none() {
            return Ok(false);
        }
        if !self.documents.store_exists(name).await? {
            return Ok(false);
        }
        Ok(self.documents.count_deleted_documents(name).await? > 0)
    }

    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, AppError> {
        self.registry.list_active().await
    }

    pub async fn list_deleted_tenants(&self) -> Result<Vec<Tenant>, AppError> {
        self.registry.list_deleted().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{InMemoryDocumentStore, InMemoryTenantRegistry};
    use chrono::Utc;
    use pdfingest_core::models::{NewDocument, TenantStatus};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Fixture {
        registry: Arc<InMemoryTenantRegistry>,
        documents: Arc<InMemoryDocumentStore>,
        service: TenantService,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(InMemoryTenantRegistry::new());
        let documents = Arc::new(InMemoryDocumentStore::new());
        let service = TenantService::new(
            registry.clone(),
            documents.clone(),
            "localhost".to_string(),
            5432,
        );
        Fixture {
            registry,
            documents,
            service,
        }
    }

    async fn add_document(documents: &InMemoryDocumentStore, tenant: &str, file: &str) {
        documents
            .insert_document(&NewDocument {
                tenant_name: tenant.to_string(),
                file_name: file.to_string(),
                file_size: 10,
                storage_path: format!("{}/{}", tenant, file),
                storage_url: format!("memory://{}/{}", tenant, file),
                extracted_text: "text".to_string(),
                summary: "text".to_string(),
                uploaded_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_or_create_provisions_and_registers() {
        let f = fixture();
        let tenant = f.service.get_or_create_tenant("acme_test").await.unwrap();

        assert_eq!(tenant.tenant_name, "acme_test");
        assert_eq!(tenant.db_name, "tenant_acme_test");
        assert_eq!(tenant.db_host, "localhost");
        assert_eq!(tenant.db_port, 5432);
        assert_eq!(tenant.status, TenantStatus::Active);
        assert!(f.documents.store_exists("acme_test").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_or_create_returns_existing_row() {
        let f = fixture();
        let first = f.service.get_or_create_tenant("acme_test").await.unwrap();
        let second = f.service.get_or_create_tenant("acme_test").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(f.registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_provisioning_failure_leaves_registry_untouched() {
        let f = fixture();
        f.documents.fail_provisioning(true);
        assert!(f.service.get_or_create_tenant("acme_test").await.is_err());
        assert_eq!(f.registry.len().await, 0);
    }

    /// Registry whose first lookup misses, simulating a concurrent creator that
    /// inserts between our lookup and our insert.
    struct RacingRegistry {
        inner: InMemoryTenantRegistry,
        missed_once: AtomicBool,
    }

    #[async_trait::async_trait]
    impl TenantRegistry for RacingRegistry {
        async fn find_active(&self, name: &str) -> Result<Option<Tenant>, AppError> {
            if !self.missed_once.swap(true, Ordering::SeqCst) {
                self.inner
                    .insert(&NewTenant::new(name, "other-host", 5432))
                    .await?;
                return Ok(None);
            }
            self.inner.find_active(name).await
        }
        async fn insert(&self, tenant: &NewTenant) -> Result<Tenant, AppError> {
            self.inner.insert(tenant).await
        }
        async fn mark_deleted(&self, name: &str) -> Result<(), AppError> {
            self.inner.mark_deleted(name).await
        }
        async fn mark_restored(&self, name: &str) -> Result<(), AppError> {
            self.inner.mark_restored(name).await
        }
        async fn list_active(&self) -> Result<Vec<Tenant>, AppError> {
            self.inner.list_active().await
        }
        async fn list_deleted(&self) -> Result<Vec<Tenant>, AppError> {
            self.inner.list_deleted().await
        }
    }

    #[tokio::test]
    async fn test_insert_conflict_refetches_winner() {
        let registry = Arc::new(RacingRegistry {
            inner: InMemoryTenantRegistry::new(),
            missed_once: AtomicBool::new(false),
        });
        let service = TenantService::new(
            registry.clone(),
            Arc::new(InMemoryDocumentStore::new()),
            "localhost".to_string(),
            5432,
        );

        let tenant = service.get_or_create_tenant("acme_test").await.unwrap();
        assert_eq!(tenant.db_host, "other-host");
        assert_eq!(registry.inner.len().await, 1);
    }

    #[tokio::test]
    async fn test_upload_to_deleted_name_conflicts() {
        let f = fixture();
        f.service.get_or_create_tenant("acme_test").await.unwrap();
        f.service.delete_tenant("acme_test").await.unwrap();

        let err = f.service.get_or_create_tenant("acme_test").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("restore it")));
    }

    #[tokio::test]
    async fn test_delete_marks_documents_then_tenant() {
        let f = fixture();
        f.service.get_or_create_tenant("acme_test").await.unwrap();
        add_document(&f.documents, "acme_test", "a.pdf").await;
        add_document(&f.documents, "acme_test", "b.pdf").await;

        let response = f.service.delete_tenant("acme_test").await.unwrap();
        assert_eq!(response.documents_marked_deleted, 2);
        assert!(response.soft_deleted);

        let row = f.registry.get("acme_test").await.unwrap();
        assert_eq!(row.status, TenantStatus::Deleted);
        assert!(row.is_deleted);
        assert!(row.deleted_at.is_some());
        assert!(f
            .documents
            .documents("acme_test")
            .await
            .iter()
            .all(|d| d.is_deleted && d.deleted_at.is_some()));

        assert!(f.service.list_tenants().await.unwrap().is_empty());
        assert_eq!(f.service.list_deleted_tenants().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let f = fixture();
        f.service.get_or_create_tenant("acme_test").await.unwrap();
        add_document(&f.documents, "acme_test", "a.pdf").await;
        f.service.delete_tenant("acme_test").await.unwrap();

        let err = f.service.delete_tenant("acme_test").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(f.documents.count_deleted_documents("acme_test").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_tenant_is_not_found() {
        let f = fixture();
        let err = f.service.delete_tenant("nobody").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Not found: tenant 'nobody' not found or already deleted"
        );
    }

    #[tokio::test]
    async fn test_delete_completes_after_partial_run() {
        let f = fixture();
        f.service.get_or_create_tenant("acme_test").await.unwrap();
        add_document(&f.documents, "acme_test", "a.pdf").await;
        // Documents marked, registry row never flipped.
        f.documents.soft_delete_all("acme_test").await.unwrap();
        add_document(&f.documents, "acme_test", "b.pdf").await;

        let response = f.service.delete_tenant("acme_test").await.unwrap();
        assert_eq!(response.documents_marked_deleted, 1);
        assert!(f.registry.get("acme_test").await.unwrap().is_deleted);
        assert_eq!(f.documents.count_documents("acme_test").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_restore_reverses_delete() {
        let f = fixture();
        let original = f.service.get_or_create_tenant("acme_test").await.unwrap();
        add_document(&f.documents, "acme_test", "a.pdf").await;
        add_document(&f.documents, "acme_test", "b.pdf").await;
        f.service.delete_tenant("acme_test").await.unwrap();

        let response = f.service.restore_tenant("acme_test").await.unwrap();
        assert!(response.restored);
        assert_eq!(response.documents_restored, 2);
        assert_eq!(response.status, TenantStatus::Active);

        let row = f.registry.get("acme_test").await.unwrap();
        assert!(row.is_active());
        assert!(row.deleted_at.is_none());
        assert_eq!(row.id, original.id);
        assert_eq!(f.documents.count_documents("acme_test").await.unwrap(), 2);
        assert!(f
            .documents
            .documents("acme_test")
            .await
            .iter()
            .all(|d| d.deleted_at.is_none()));
    }

    #[tokio::test]
    async fn test_restore_active_tenant_is_not_found() {
        let f = fixture();
        f.service.get_or_create_tenant("acme_test").await.unwrap();
        add_document(&f.documents, "acme_test", "a.pdf").await;

        let err = f.service.restore_tenant("acme_test").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Not found: tenant 'acme_test' not found or not deleted"
        );
        let err = f.service.restore_tenant("nobody").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_restore_completes_interrupted_restore() {
        let f = fixture();
        f.service.get_or_create_tenant("acme_test").await.unwrap();
        add_document(&f.documents, "acme_test", "a.pdf").await;
        f.service.delete_tenant("acme_test").await.unwrap();
        // Registry flipped, documents never unmarked.
        f.registry.mark_restored("acme_test").await.unwrap();

        let response = f.service.restore_tenant("acme_test").await.unwrap();
        assert_eq!(response.documents_restored, 1);
        assert_eq!(f.documents.count_documents("acme_test").await.unwrap(), 1);
    }

    #[test]
    fn test_validate_tenant_name_maps_to_invalid_input() {
        assert!(TenantService::validate_tenant_name("acme_test").is_ok());
        let err = TenantService::validate_tenant_name("a-b-c").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: Invalid tenant name: tenant name can only contain letters, numbers, and underscores"
        );
    }
}

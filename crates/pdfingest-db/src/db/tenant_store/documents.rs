use pdfingest_core::models::{tenant_store_name, Document, NewDocument};
use pdfingest_core::validation::validate_tenant_name;
use pdfingest_core::AppError;
use sqlx::{PgPool, Postgres};

const DOCUMENT_COLUMNS: &str = "id, tenant_name, file_name, file_size, storage_path, storage_url, \
                                extracted_text, summary, uploaded_at, is_deleted, deleted_at";

/// Per-tenant document storage.
///
/// Every method addresses the store by tenant name. All methods except `provision` and
/// `store_exists` expect the store to have been provisioned.
#[async_trait::async_trait]
pub trait TenantDocumentStore: Send + Sync {
    /// Create the tenant's store, its `documents` table and indexes. Idempotent.
    async fn provision(&self, tenant_name: &str) -> Result<(), AppError>;

    /// Record one uploaded document. The store assigns the id.
    async fn insert_document(&self, document: &NewDocument) -> Result<Document, AppError>;

    /// Mark every live document deleted; returns how many were marked.
    async fn soft_delete_all(&self, tenant_name: &str) -> Result<u64, AppError>;

    /// Unmark every deleted document; returns how many were restored.
    async fn restore_all(&self, tenant_name: &str) -> Result<u64, AppError>;

    /// Number of live documents.
    async fn count_documents(&self, tenant_name: &str) -> Result<i64, AppError>;

    /// Number of soft-deleted documents.
    async fn count_deleted_documents(&self, tenant_name: &str) -> Result<i64, AppError>;

    async fn store_exists(&self, tenant_name: &str) -> Result<bool, AppError>;

    /// Hard-remove the store and everything in it.
    async fn drop_store(&self, tenant_name: &str) -> Result<(), AppError>;
}

/// Schema-per-tenant document store: schema `tenant_<name>` holding table `documents`.
#[derive(Clone)]
pub struct PgTenantDocumentStore {
    pool: PgPool,
}

impl PgTenantDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Quoted schema identifier for a tenant.
///
/// Identifiers cannot be bound as parameters, so the name is re-validated here before it
/// is spliced into SQL.
fn quoted_schema(tenant_name: &str) -> Result<String, AppError> {
    validate_tenant_name(tenant_name)?;
    Ok(format!("\"{}\"", tenant_store_name(tenant_name)))
}

fn db_error(e: sqlx::Error, tenant_name: &str, context: &'static str) -> AppError {
    tracing::error!(error = %e, tenant_name = %tenant_name, "{}", context);
    AppError::Database(e)
}

#[async_trait::async_trait]
impl TenantDocumentStore for PgTenantDocumentStore {
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "create"))]
    async fn provision(&self, tenant_name: &str) -> Result<(), AppError> {
        let schema = quoted_schema(tenant_name)?;
        let statements = [
            format!("CREATE SCHEMA IF NOT EXISTS {}", schema),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {}.documents (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    tenant_name VARCHAR(50) NOT NULL,
                    file_name TEXT NOT NULL,
                    file_size BIGINT NOT NULL,
                    storage_path TEXT NOT NULL,
                    storage_url TEXT NOT NULL,
                    extracted_text TEXT NOT NULL DEFAULT '',
                    summary TEXT NOT NULL DEFAULT '',
                    uploaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
                    deleted_at TIMESTAMPTZ
                )
                "#,
                schema
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_documents_tenant_uploaded ON {}.documents (tenant_name, uploaded_at DESC)",
                schema
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_documents_file_name ON {}.documents (file_name)",
                schema
            ),
        ];

        // Concurrent IF NOT EXISTS DDL on the same schema can still collide in the
        // catalog, so first-time provisioning is serialized per tenant.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error(e, tenant_name, "Failed to begin provisioning"))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(tenant_store_name(tenant_name))
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error(e, tenant_name, "Failed to lock tenant store"))?;

        for statement in &statements {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error(e, tenant_name, "Failed to provision tenant store"))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error(e, tenant_name, "Failed to commit provisioning"))?;

        tracing::info!(tenant_name = %tenant_name, "Tenant document store provisioned");
        Ok(())
    }

    #[tracing::instrument(skip(self, document), fields(db.table = "documents", db.operation = "insert", tenant_name = %document.tenant_name))]
    async fn insert_document(&self, document: &NewDocument) -> Result<Document, AppError> {
        let schema = quoted_schema(&document.tenant_name)?;
        sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            INSERT INTO {}.documents (
                tenant_name, file_name, file_size, storage_path, storage_url,
                extracted_text, summary, uploaded_at, is_deleted
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE)
            RETURNING {}
            "#,
            schema, DOCUMENT_COLUMNS
        ))
        .bind(&document.tenant_name)
        .bind(&document.file_name)
        .bind(document.file_size)
        .bind(&document.storage_path)
        .bind(&document.storage_url)
        .bind(&document.extracted_text)
        .bind(&document.summary)
        .bind(document.uploaded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, &document.tenant_name, "Failed to insert document"))
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "update"))]
    async fn soft_delete_all(&self, tenant_name: &str) -> Result<u64, AppError> {
        let schema = quoted_schema(tenant_name)?;
        let result = sqlx::query(&format!(
            "UPDATE {}.documents SET is_deleted = TRUE, deleted_at = NOW() WHERE is_deleted = FALSE",
            schema
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, tenant_name, "Failed to soft delete documents"))?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "update"))]
    async fn restore_all(&self, tenant_name: &str) -> Result<u64, AppError> {
        let schema = quoted_schema(tenant_name)?;
        let result = sqlx::query(&format!(
            "UPDATE {}.documents SET is_deleted = FALSE, deleted_at = NULL WHERE is_deleted = TRUE",
            schema
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, tenant_name, "Failed to restore documents"))?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn count_documents(&self, tenant_name: &str) -> Result<i64, AppError> {
        let schema = quoted_schema(tenant_name)?;
        sqlx::query_scalar::<Postgres, i64>(&format!(
            "SELECT COUNT(*) FROM {}.documents WHERE is_deleted = FALSE",
            schema
        ))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, tenant_name, "Failed to count documents"))
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn count_deleted_documents(&self, tenant_name: &str) -> Result<i64, AppError> {
        let schema = quoted_schema(tenant_name)?;
        sqlx::query_scalar::<Postgres, i64>(&format!(
            "SELECT COUNT(*) FROM {}.documents WHERE is_deleted = TRUE",
            schema
        ))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, tenant_name, "Failed to count deleted documents"))
    }

    #[tracing::instrument(skip(self), fields(db.table = "information_schema.schemata", db.operation = "select"))]
    async fn store_exists(&self, tenant_name: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = $1)",
        )
        .bind(tenant_store_name(tenant_name))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(e, tenant_name, "Failed to check tenant store"))
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "drop"))]
    async fn drop_store(&self, tenant_name: &str) -> Result<(), AppError> {
        let schema = quoted_schema(tenant_name)?;
        sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", schema))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(e, tenant_name, "Failed to drop tenant store"))?;

        tracing::warn!(tenant_name = %tenant_name, "Tenant document store dropped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_schema() {
        assert_eq!(quoted_schema("acme_test").unwrap(), "\"tenant_acme_test\"");
    }

    #[test]
    fn test_quoted_schema_rejects_injection() {
        assert!(matches!(
            quoted_schema("x\"; DROP SCHEMA public; --"),
            Err(AppError::InvalidInput(_))
        ));
    }
}

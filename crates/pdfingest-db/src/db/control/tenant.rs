use pdfingest_core::models::{NewTenant, Tenant};
use pdfingest_core::AppError;
use sqlx::{PgPool, Postgres};

const TENANT_COLUMNS: &str = "id, tenant_name, db_host, db_port, db_name, status, is_deleted, \
                              deleted_at, created_at, updated_at";

/// Authoritative record of which tenants exist and where their documents live.
#[async_trait::async_trait]
pub trait TenantRegistry: Send + Sync {
    /// Active (not soft-deleted) row for `tenant_name`.
    async fn find_active(&self, tenant_name: &str) -> Result<Option<Tenant>, AppError>;

    /// Insert an active row. A taken name yields `AppError::Conflict`.
    async fn insert(&self, tenant: &NewTenant) -> Result<Tenant, AppError>;

    /// Flip an active row to deleted. `NotFound` when no active row matched.
    async fn mark_deleted(&self, tenant_name: &str) -> Result<(), AppError>;

    /// Flip a deleted row back to active. `NotFound` when no deleted row matched.
    async fn mark_restored(&self, tenant_name: &str) -> Result<(), AppError>;

    /// Active tenants, newest first.
    async fn list_active(&self) -> Result<Vec<Tenant>, AppError>;

    /// Soft-deleted tenants, most recently deleted first.
    async fn list_deleted(&self) -> Result<Vec<Tenant>, AppError>;
}

/// PostgreSQL-backed tenant registry (`tenants` table)
#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(e: sqlx::Error, context: &'static str) -> AppError {
    tracing::error!(error = %e, "{}", context);
    AppError::Database(e)
}

#[async_trait::async_trait]
impl TenantRegistry for TenantRepository {
    #[tracing::instrument(skip(self), fields(db.table = "tenants", db.operation = "select"))]
    async fn find_active(&self, tenant_name: &str) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<Postgres, Tenant>(&format!(
            "SELECT {} FROM tenants WHERE tenant_name = $1 AND is_deleted = FALSE",
            TENANT_COLUMNS
        ))
        .bind(tenant_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to fetch tenant"))
    }

    #[tracing::instrument(skip(self, tenant), fields(db.table = "tenants", db.operation = "insert", tenant_name = %tenant.tenant_name))]
    async fn insert(&self, tenant: &NewTenant) -> Result<Tenant, AppError> {
        let result = sqlx::query_as::<Postgres, Tenant>(&format!(
            r#"
            INSERT INTO tenants (tenant_name, db_host, db_port, db_name, status, is_deleted)
            VALUES ($1, $2, $3, $4, 'active', FALSE)
            RETURNING {}
            "#,
            TENANT_COLUMNS
        ))
        .bind(&tenant.tenant_name)
        .bind(&tenant.db_host)
        .bind(tenant.db_port)
        .bind(&tenant.db_name)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                tracing::info!(tenant_name = %row.tenant_name, tenant_id = row.id, "Tenant registered");
                Ok(row)
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                tracing::debug!(tenant_name = %tenant.tenant_name, "Tenant name already registered");
                Err(AppError::Conflict(format!(
                    "tenant '{}' already exists",
                    tenant.tenant_name
                )))
            }
            Err(e) => Err(db_error(e, "Failed to insert tenant")),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "tenants", db.operation = "update"))]
    async fn mark_deleted(&self, tenant_name: &str) -> Result<(), AppError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE tenants
            SET status = 'deleted', is_deleted = TRUE, deleted_at = NOW(), updated_at = NOW()
            WHERE tenant_name = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(tenant_name)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to soft delete tenant"))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "tenant '{}' not found or already deleted",
                tenant_name
            )));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "tenants", db.operation = "update"))]
    async fn mark_restored(&self, tenant_name: &str) -> Result<(), AppError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE tenants
            SET status = 'active', is_deleted = FALSE, deleted_at = NULL, updated_at = NOW()
            WHERE tenant_name = $1 AND is_deleted = TRUE
            "#,
        )
        .bind(tenant_name)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to restore tenant"))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "tenant '{}' not found or not deleted",
                tenant_name
            )));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "tenants", db.operation = "select"))]
    async fn list_active(&self) -> Result<Vec<Tenant>, AppError> {
        sqlx::query_as::<Postgres, Tenant>(&format!(
            "SELECT {} FROM tenants WHERE is_deleted = FALSE ORDER BY created_at DESC",
            TENANT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to list tenants"))
    }

    #[tracing::instrument(skip(self), fields(db.table = "tenants", db.operation = "select"))]
    async fn list_deleted(&self) -> Result<Vec<Tenant>, AppError> {
        sqlx::query_as::<Postgres, Tenant>(&format!(
            "SELECT {} FROM tenants WHERE is_deleted = TRUE ORDER BY deleted_at DESC",
            TENANT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(e, "Failed to list deleted tenants"))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Prefix of every per-tenant document store.
pub const TENANT_STORE_PREFIX: &str = "tenant_";

/// Name of the document store (database schema) that holds a tenant's documents.
pub fn tenant_store_name(tenant_name: &str) -> String {
    format!("{}{}", TENANT_STORE_PREFIX, tenant_name)
}

/// Tenant status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "tenant_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Deleted,
}

/// Registry row for a tenant.
///
/// `is_deleted` always agrees with `status == Deleted`, and `deleted_at` is set exactly
/// when `is_deleted` is true. Rows are never physically removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Tenant {
    pub id: i32,
    pub tenant_name: String,
    pub db_host: String,
    pub db_port: i32,
    pub db_name: String,
    pub status: TenantStatus,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active && !self.is_deleted
    }
}

/// Values for a registry insert. Timestamps and id come from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenant {
    pub tenant_name: String,
    pub db_host: String,
    pub db_port: i32,
    pub db_name: String,
}

impl NewTenant {
    pub fn new(tenant_name: &str, db_host: &str, db_port: i32) -> Self {
        Self {
            tenant_name: tenant_name.to_string(),
            db_host: db_host.to_string(),
            db_port,
            db_name: tenant_store_name(tenant_name),
        }
    }
}

/// `GET /api/v1/tenants` payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantList {
    pub tenants: Vec<Tenant>,
    pub count: usize,
    pub status: TenantStatus,
}

impl From<Vec<Tenant>> for TenantList {
    fn from(tenants: Vec<Tenant>) -> Self {
        TenantList {
            count: tenants.len(),
            tenants,
            status: TenantStatus::Active,
        }
    }
}

/// `GET /api/v1/tenants/deleted` payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedTenantList {
    pub tenants: Vec<Tenant>,
    pub count: usize,
    pub status: TenantStatus,
    pub note: String,
}

impl From<Vec<Tenant>> for DeletedTenantList {
    fn from(tenants: Vec<Tenant>) -> Self {
        DeletedTenantList {
            count: tenants.len(),
            tenants,
            status: TenantStatus::Deleted,
            note: "These tenants can be restored using POST /api/v1/tenant/:name/restore"
                .to_string(),
        }
    }
}

/// `DELETE /api/v1/tenant/:name` payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantDeleteResponse {
    pub tenant_name: String,
    pub soft_deleted: bool,
    pub documents_marked_deleted: u64,
    pub can_restore: bool,
    pub message: String,
    pub restore_command: String,
}

impl TenantDeleteResponse {
    pub fn new(tenant_name: &str, documents_marked_deleted: u64) -> Self {
        Self {
            tenant_name: tenant_name.to_string(),
            soft_deleted: true,
            documents_marked_deleted,
            can_restore: true,
            message: format!(
                "Tenant '{}' and {} documents marked as deleted. Can be restored.",
                tenant_name, documents_marked_deleted
            ),
            restore_command: format!("POST /api/v1/tenant/{}/restore", tenant_name),
        }
    }
}

/// `POST /api/v1/tenant/:name/restore` payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantRestoreResponse {
    pub tenant_name: String,
    pub restored: bool,
    pub documents_restored: u64,
    pub status: TenantStatus,
    pub message: String,
}

impl TenantRestoreResponse {
    pub fn new(tenant_name: &str, documents_restored: u64) -> Self {
        Self {
            tenant_name: tenant_name.to_string(),
            restored: true,
            documents_restored,
            status: TenantStatus::Active,
            message: format!(
                "Tenant '{}' and {} documents have been restored and are now active",
                tenant_name, documents_restored
            ),
        }
    }
}

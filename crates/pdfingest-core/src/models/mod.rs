//! Data models
//!
//! Registry rows (`Tenant`), per-tenant document rows (`Document`) and the response
//! payloads built from them.

mod document;
mod tenant;

pub use document::{Document, NewDocument, UploadResponse};
pub use tenant::{
    tenant_store_name, DeletedTenantList, NewTenant, Tenant, TenantDeleteResponse, TenantList,
    TenantRestoreResponse, TenantStatus,
};

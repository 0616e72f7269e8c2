//! Database repositories for data access layer
//!
//! Repositories are organized into control/ (the tenant registry) and tenant_store/
//! (the schema-per-tenant document stores). The two never share a transaction: each
//! method is one statement (or one idempotent batch) on the pool.
//
// Tenant registry
pub mod control;
//
// Per-tenant document stores
pub mod tenant_store;

pub use control::{TenantRegistry, TenantRepository};
pub use tenant_store::{PgTenantDocumentStore, TenantDocumentStore};

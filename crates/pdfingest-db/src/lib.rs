//! pdfingest database library
//!
//! PostgreSQL access for the tenant registry and the per-tenant document stores.

pub mod db;

pub use db::{
    PgTenantDocumentStore, TenantDocumentStore, TenantRegistry, TenantRepository,
};

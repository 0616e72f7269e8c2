pub mod documents;

pub use documents::{PgTenantDocumentStore, TenantDocumentStore};

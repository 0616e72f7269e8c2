pub mod tenant;

pub use tenant::{TenantRegistry, TenantRepository};

pub mod tenants;
pub mod upload;

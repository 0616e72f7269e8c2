//! API constants
//!
//! Route prefix and the service name reported by `/health`.

/// Versioned prefix shared by every business route.
pub const API_PREFIX: &str = "/api/v1";

pub const SERVICE_NAME: &str = "pdf-ingestion-service";

/// Multipart framing allowance added on top of the maximum PDF size, so an oversize
/// file still reaches the upload validator and gets its message.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Multipart field names of `POST /api/v1/upload`.
pub const TENANT_NAME_FIELD: &str = "tenantName";
pub const PDF_FIELD: &str = "pdf";

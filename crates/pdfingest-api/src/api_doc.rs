//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use pdfingest_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PDF Ingestion API",
        version = "0.1.0",
        description = "Multi-tenant PDF ingestion: upload a PDF for a tenant, get it stored, text-extracted and summarized. Tenants are created on first upload and can be soft-deleted and restored."
    ),
    paths(
        handlers::upload::upload_pdf,
        handlers::tenants::list_tenants,
        handlers::tenants::list_deleted_tenants,
        handlers::tenants::delete_tenant,
        handlers::tenants::restore_tenant,
    ),
    components(schemas(
        error::ErrorResponse,
        models::UploadResponse,
        models::Tenant,
        models::TenantStatus,
        models::TenantList,
        models::DeletedTenantList,
        models::TenantDeleteResponse,
        models::TenantRestoreResponse,
    )),
    tags(
        (name = "upload", description = "PDF upload pipeline"),
        (name = "tenants", description = "Tenant listing, soft delete and restore")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let spec = ApiDoc::openapi();
        for path in [
            "/api/v1/upload",
            "/api/v1/tenants",
            "/api/v1/tenants/deleted",
            "/api/v1/tenant/{name}",
            "/api/v1/tenant/{name}/restore",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}

//! Tenant listing and lifecycle handlers.

use crate::error::{ApiResponse, ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::extract::{Path, State};
use pdfingest_core::models::{
    DeletedTenantList, TenantDeleteResponse, TenantList, TenantRestoreResponse,
};
use pdfingest_services::TenantService;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/tenants",
    tag = "tenants",
    responses(
        (status = 200, description = "Active tenants, newest first", body = ApiResponse<TenantList>),
        (status = 500, description = "Registry unavailable", body = ErrorResponse)
    )
)]
pub async fn list_tenants(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<TenantList>, HttpAppError> {
    let tenants = state.tenants.list_tenants().await?;
    Ok(ApiResponse::ok(TenantList::from(tenants)))
}

#[utoipa::path(
    get,
    path = "/api/v1/tenants/deleted",
    tag = "tenants",
    responses(
        (status = 200, description = "Soft-deleted tenants, most recently deleted first", body = ApiResponse<DeletedTenantList>),
        (status = 500, description = "Registry unavailable", body = ErrorResponse)
    )
)]
pub async fn list_deleted_tenants(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<DeletedTenantList>, HttpAppError> {
    let tenants = state.tenants.list_deleted_tenants().await?;
    Ok(ApiResponse::ok(DeletedTenantList::from(tenants)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tenant/{name}",
    tag = "tenants",
    params(
        ("name" = String, Path, description = "Tenant name")
    ),
    responses(
        (status = 200, description = "Tenant and its documents soft-deleted", body = ApiResponse<TenantDeleteResponse>),
        (status = 400, description = "Invalid tenant name", body = ErrorResponse),
        (status = 404, description = "Tenant not found or already deleted", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn delete_tenant(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<ApiResponse<TenantDeleteResponse>, HttpAppError> {
    TenantService::validate_tenant_name(&name)?;
    let response = state.tenants.delete_tenant(&name).await?;
    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/tenant/{name}/restore",
    tag = "tenants",
    params(
        ("name" = String, Path, description = "Tenant name")
    ),
    responses(
        (status = 200, description = "Tenant and its documents restored", body = ApiResponse<TenantRestoreResponse>),
        (status = 400, description = "Invalid tenant name", body = ErrorResponse),
        (status = 404, description = "Tenant not found or not deleted", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn restore_tenant(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<ApiResponse<TenantRestoreResponse>, HttpAppError> {
    TenantService::validate_tenant_name(&name)?;
    let response = state.tenants.restore_tenant(&name).await?;
    Ok(ApiResponse::ok(response))
}

use crate::constants::{PDF_FIELD, TENANT_NAME_FIELD};
use crate::error::{ApiResponse, ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::extract::{multipart::MultipartRejection, Multipart, State};
use pdfingest_core::models::UploadResponse;
use pdfingest_services::{PdfFile, PdfUpload};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/v1/upload",
    tag = "upload",
    request_body(
        content = inline(Object),
        content_type = "multipart/form-data",
        description = "Fields: `tenantName` (text) and `pdf` (file)"
    ),
    responses(
        (status = 200, description = "PDF stored and recorded", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Invalid tenant name or file", body = ErrorResponse),
        (status = 409, description = "Tenant is soft-deleted", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 500, description = "Store or record step failed", body = ErrorResponse)
    )
)]
pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiResponse<UploadResponse>, HttpAppError> {
    let upload = read_upload(multipart?).await?;
    let response = state.uploads.process(upload).await?;
    Ok(ApiResponse::ok(response))
}

/// Collect the form fields. Unknown fields are skipped; a repeated field keeps the
/// last value.
async fn read_upload(mut multipart: Multipart) -> Result<PdfUpload, HttpAppError> {
    let mut tenant_name = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(TENANT_NAME_FIELD) => {
                tenant_name = Some(field.text().await?);
            }
            Some(PDF_FIELD) => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                file = Some(PdfFile { file_name, data });
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown form field");
            }
        }
    }

    Ok(PdfUpload {
        tenant_name: tenant_name.unwrap_or_default(),
        file,
    })
}

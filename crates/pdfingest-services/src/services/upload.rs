//! Upload pipeline.
//!
//! validate -> tenant ready -> extract text -> store file -> summarize -> record.
//! Validation runs before any side effect. Extraction and summarization degrade to
//! placeholders instead of failing. A failed store or record step fails the request
//! and leaves whatever was already written in place.

use bytes::Bytes;
use chrono::Utc;
use pdfingest_core::models::{NewDocument, UploadResponse};
use pdfingest_core::validation::{sanitize_file_name, validate_pdf, PdfValidationError};
use pdfingest_core::AppError;
use pdfingest_storage::{generate_storage_key, Storage, PDF_CONTENT_TYPE};
use std::sync::Arc;
use std::time::Instant;

use super::extraction::TextExtraction;
use super::summarization::SummarizationService;
use super::tenant_lifecycle::TenantService;

/// The uploaded file part.
#[derive(Debug, Clone)]
pub struct PdfFile {
    pub file_name: String,
    pub data: Bytes,
}

/// One upload request as received from the client.
#[derive(Debug, Clone)]
pub struct PdfUpload {
    pub tenant_name: String,
    pub file: Option<PdfFile>,
}

#[derive(Clone)]
pub struct UploadOrchestrator {
    tenants: TenantService,
    storage: Arc<dyn Storage>,
    extractor: Arc<dyn TextExtraction>,
    summarizer: SummarizationService,
    max_file_size: usize,
}

impl UploadOrchestrator {
    pub fn new(
        tenants: TenantService,
        storage: Arc<dyn Storage>,
        extractor: Arc<dyn TextExtraction>,
        summarizer: SummarizationService,
        max_file_size: usize,
    ) -> Self {
        Self {
            tenants,
            storage,
            extractor,
            summarizer,
            max_file_size,
        }
    }

    #[tracing::instrument(skip(self, upload), fields(tenant_name = %upload.tenant_name))]
    pub async fn process(&self, upload: PdfUpload) -> Result<UploadResponse, AppError> {
        let start = Instant::now();

        TenantService::validate_tenant_name(&upload.tenant_name)?;
        let file = upload.file.ok_or(PdfValidationError::Missing)?;
        let file_name = sanitize_file_name(&file.file_name);
        validate_pdf(&file_name, file.data.len(), self.max_file_size)?;

        let tenant = self.tenants.get_or_create_tenant(&upload.tenant_name).await?;

        let extracted_text = self.extractor.extract(&file_name, file.data.clone()).await;

        let uploaded_at = Utc::now();
        let storage_key = generate_storage_key(&tenant.tenant_name, &file_name, uploaded_at);
        let file_size = file.data.len() as i64;
        let stored = self
            .storage
            .put(&storage_key, file.data, PDF_CONTENT_TYPE)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %storage_key, "Failed to store PDF");
                AppError::from(e)
            })?;

        let summary = self.summarizer.summarize(&extracted_text).await;

        let document = self
            .tenants
            .documents()
            .insert_document(&NewDocument {
                tenant_name: tenant.tenant_name.clone(),
                file_name,
                file_size,
                storage_path: stored.key,
                storage_url: stored.url,
                extracted_text,
                summary,
                uploaded_at,
            })
            .await
            .inspect_err(|_| {
                tracing::warn!(key = %storage_key, "Document not recorded; stored object is orphaned");
            })?;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            tenant_name = %document.tenant_name,
            document_id = %document.id,
            file_size = document.file_size,
            processing_time_ms = processing_time_ms,
            "PDF upload processed"
        );

        Ok(UploadResponse::from_document(document, processing_time_ms))
    }
}

//! pdfingest services layer
//!
//! Business services: tenant provisioning and lifecycle, the upload pipeline and the
//! two enrichment adapters (text extraction, summarization). Handlers in
//! `pdfingest-api` stay thin and delegate here.

pub mod services;

pub use pdfingest_storage::{create_storage, Storage, StorageError, StorageResult};
pub use services::extraction::{PdfTextExtractor, TextExtraction};
pub use services::summarization::{
    fallback_summary, AnthropicSummaryClient, SummarizationService, SummaryClient,
};
pub use services::tenant_lifecycle::TenantService;
pub use services::upload::{PdfFile, PdfUpload, UploadOrchestrator};

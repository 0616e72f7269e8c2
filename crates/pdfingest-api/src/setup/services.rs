//! Service wiring

use crate::state::AppState;
use anyhow::Result;
use pdfingest_core::Config;
use pdfingest_db::{PgTenantDocumentStore, TenantRepository};
use pdfingest_services::{
    PdfTextExtractor, SummarizationService, TenantService, UploadOrchestrator,
};
use pdfingest_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Build repositories and services on top of the pool and object store.
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let registry = Arc::new(TenantRepository::new(pool.clone()));
    let documents = Arc::new(PgTenantDocumentStore::new(pool));

    let tenants = TenantService::new(
        registry,
        documents,
        config.tenant_db_host().to_string(),
        config.tenant_db_port(),
    );

    let summarizer = SummarizationService::from_config(config)?;
    let uploads = UploadOrchestrator::new(
        tenants.clone(),
        storage,
        Arc::new(PdfTextExtractor::new()),
        summarizer,
        config.max_pdf_size_bytes(),
    );

    tracing::info!(
        max_pdf_mb = config.max_pdf_size_bytes() / 1024 / 1024,
        "Services initialized"
    );

    Ok(Arc::new(AppState::new(tenants, uploads)))
}

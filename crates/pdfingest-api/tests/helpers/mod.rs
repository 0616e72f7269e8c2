//! Test helpers: build the router over in-memory stores.
//!
//! Run from workspace root: `cargo test -p pdfingest-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use pdfingest_api::{build_router, constants, AppState};
use pdfingest_services::services::testing::{
    FixedTextExtractor, InMemoryDocumentStore, InMemoryStorage, InMemoryTenantRegistry,
};
use pdfingest_services::{
    SummarizationService, TenantService, TextExtraction, UploadOrchestrator,
};
use std::sync::Arc;
use std::time::Duration;

/// Maximum PDF size used by test routers.
pub const TEST_MAX_PDF_BYTES: usize = 1024 * 1024;

/// Text every upload "extracts" unless a test picks another extractor.
pub const EXTRACTED_TEXT: &str = "Quarterly report. Revenue grew in every region.";

/// API path with version prefix (e.g. `/api/v1/tenants`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on the stores behind it.
pub struct TestApp {
    pub server: TestServer,
    pub registry: Arc<InMemoryTenantRegistry>,
    pub documents: Arc<InMemoryDocumentStore>,
    pub storage: Arc<InMemoryStorage>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with_extractor(Arc::new(FixedTextExtractor(EXTRACTED_TEXT.to_string())))
}

pub fn setup_test_app_with_extractor(extractor: Arc<dyn TextExtraction>) -> TestApp {
    setup_test_app_with(
        extractor,
        SummarizationService::new(None, Duration::from_secs(1)),
    )
}

pub fn setup_test_app_with(
    extractor: Arc<dyn TextExtraction>,
    summarizer: SummarizationService,
) -> TestApp {
    let registry = Arc::new(InMemoryTenantRegistry::new());
    let documents = Arc::new(InMemoryDocumentStore::new());
    let storage = Arc::new(InMemoryStorage::new());

    let tenants = TenantService::new(
        registry.clone(),
        documents.clone(),
        "localhost".to_string(),
        5432,
    );
    let uploads = UploadOrchestrator::new(
        tenants.clone(),
        storage.clone(),
        extractor,
        summarizer,
        TEST_MAX_PDF_BYTES,
    );

    let state = Arc::new(AppState::new(tenants, uploads));
    let router = build_router(state, &["*".to_string()], TEST_MAX_PDF_BYTES)
        .expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        registry,
        documents,
        storage,
    }
}

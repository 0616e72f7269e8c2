//! Application state shared by every handler.

use pdfingest_services::{TenantService, UploadOrchestrator};

#[derive(Clone)]
pub struct AppState {
    pub tenants: TenantService,
    pub uploads: UploadOrchestrator,
}

impl AppState {
    pub fn new(tenants: TenantService, uploads: UploadOrchestrator) -> Self {
        Self { tenants, uploads }
    }
}

//! pdfingest HTTP API
//!
//! Axum router, handlers and process setup for the PDF ingestion service. The binary in
//! `main.rs` only loads configuration and hands over to [`setup`].

pub mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;

pub use setup::routes::build_router;
pub use state::AppState;

//! pdfingest infrastructure library
//!
//! Shared process plumbing for the HTTP service:
//! - Tracing subscriber initialization (text or JSON logs)
//! - Request ID middleware

pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use middleware::{get_request_id, request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};

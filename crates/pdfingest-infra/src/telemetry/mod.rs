//! Tracing initialization
//!
//! One subscriber per process: an `EnvFilter` (from `RUST_LOG`, else a debug default for
//! this service and tower-http) feeding either a human-readable or a JSON formatter.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry, LogFormat};

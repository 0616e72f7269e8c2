//! Route configuration and setup.

mod health;

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use pdfingest_core::Config;
use pdfingest_infra::request_id_middleware;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    build_router(state, config.cors_origins(), config.max_pdf_size_bytes())
}

/// Router with every route and layer, independent of process configuration.
///
/// The body limit is `max_pdf_size_bytes` plus multipart overhead so that a file a
/// little over the maximum is still parsed and rejected by the upload validator.
pub fn build_router(
    state: Arc<AppState>,
    cors_origins: &[String],
    max_pdf_size_bytes: usize,
) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(cors_origins)?;
    let body_limit = max_pdf_size_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    let app = public_routes()
        .merge(api_routes(state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware));

    Ok(app)
}

fn setup_cors(cors_origins: &[String]) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes() -> Router {
    Router::new()
        .route("/health", get(health::liveness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
}

fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            &format!("{}/upload", API_PREFIX),
            post(handlers::upload::upload_pdf),
        )
        .route(
            &format!("{}/tenants", API_PREFIX),
            get(handlers::tenants::list_tenants),
        )
        .route(
            &format!("{}/tenants/deleted", API_PREFIX),
            get(handlers::tenants::list_deleted_tenants),
        )
        .route(
            &format!("{}/tenant/{{name}}", API_PREFIX),
            delete(handlers::tenants::delete_tenant),
        )
        .route(
            &format!("{}/tenant/{{name}}/restore", API_PREFIX),
            post(handlers::tenants::restore_tenant),
        )
        .with_state(state)
}

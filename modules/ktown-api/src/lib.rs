use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use ktown_common::Config;

pub mod defaults;
pub mod error;
pub mod rest;

pub struct AppState {
    pub config: Config,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.body_limit_bytes;
    let public = ServeDir::new(&state.config.public_dir);

    Router::new()
        // Health check
        .route("/health", get(|| async { "ok" }))
        // World model
        .route("/", get(rest::api_world_data_from_defaults))
        .route("/api/world-data", post(rest::api_world_data))
        .route("/api/default-files", get(rest::api_default_files))
        .with_state(state)
        // Everything else is a static file under the public dir
        .fallback_service(public)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

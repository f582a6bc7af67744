//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{routing::any, Router};
use std::sync::Arc;
use thumbstore_core::Config;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
///
/// Everything is served from `/`; the handler dispatches on the request method.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    tracing::info!(
        max_upload_size_bytes = config.max_upload_size_bytes(),
        "Request body limit enabled"
    );

    Router::new()
        .route("/", any(handlers::dispatch))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes())),
        )
}

use crate::error::HttpAppError;
use crate::handlers::{file_download, file_upload};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use thumbstore_core::AppError;

/// Single entry point for `/`: GET downloads, POST uploads, anything else is rejected.
pub async fn dispatch(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let method = request.method().clone();
    match method {
        Method::GET => file_download::download_file(state, request)
            .await
            .into_response(),
        Method::POST => file_upload::upload_files(state, request).await,
        other => HttpAppError(AppError::MethodNotAllowed(other.to_string())).into_response(),
    }
}

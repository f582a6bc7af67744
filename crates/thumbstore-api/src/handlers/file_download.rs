use crate::error::HttpAppError;
use crate::services::download::is_keep_alive;
use crate::state::AppState;
use axum::{
    extract::{Query, Request},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use thumbstore_core::constants::FILE_QUERY_PARAM;
use thumbstore_core::AppError;

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    file: Option<String>,
}

/// Download a stored file named by the `file` query parameter.
#[tracing::instrument(
    skip_all,
    fields(uri = %request.uri(), operation = "download_file")
)]
pub async fn download_file(
    state: Arc<AppState>,
    request: Request,
) -> Result<Response, HttpAppError> {
    let name = Query::<FileQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(query)| query.file)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::MissingQueryParam(FILE_QUERY_PARAM.to_string()))?;

    let keep_alive = is_keep_alive(request.version(), request.headers());

    let prepared = state.downloads.prepare(&name).await?;
    let length = prepared.region.length;
    let content_type = prepared.content_type;

    tracing::debug!(file = %name, size_bytes = length, keep_alive, "Serving file");

    let body = prepared.region.into_body(prepared.name).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, length)
        .header(
            header::CONNECTION,
            HeaderValue::from_static(if keep_alive { "keep-alive" } else { "close" }),
        )
        .body(body)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            AppError::Internal(e.to_string()).into()
        })
}

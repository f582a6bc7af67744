use crate::error::HttpAppError;
use crate::services::upload::{DecodeSession, UploadResponse};
use crate::state::AppState;
use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use http_body_util::LengthLimitError;
use std::error::Error as StdError;
use std::sync::Arc;
use thumbstore_core::AppError;

const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Upload one or more files from a `multipart/form-data` body.
///
/// Every response, successful or not, allows any origin and closes the connection.
#[tracing::instrument(
    skip_all,
    fields(content_length = ?request.headers().get(header::CONTENT_LENGTH), operation = "upload_files")
)]
pub async fn upload_files(state: Arc<AppState>, request: Request) -> Response {
    let mut response = match receive_uploads(&state, request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}

async fn receive_uploads(state: &AppState, request: Request) -> Result<Response, HttpAppError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let mut session =
        DecodeSession::from_content_type(content_type.as_deref(), state.storage.clone())?;

    // Completed parts stay staged until the whole body has decoded cleanly.
    let mut parts = Vec::new();
    let mut body = request.into_body().into_data_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(body_error)?;
        parts.extend(session.offer(chunk).await?);
    }
    parts.extend(session.finish().await?);

    let results = state.uploads.persist_all(parts).await?;

    let response = UploadResponse::from_results(results).ok_or(AppError::NoFilePart)?;
    let json = serde_json::to_vec(&response)
        .map_err(|e| AppError::Internal(format!("Failed to encode upload response: {}", e)))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
        json,
    )
        .into_response())
}

/// Classify a failure reading the request body.
fn body_error(err: axum::Error) -> AppError {
    let mut source: Option<&(dyn StdError + 'static)> = Some(&err);
    while let Some(current) = source {
        if current.is::<LengthLimitError>() {
            return AppError::PayloadTooLarge(err.to_string());
        }
        source = current.source();
    }
    AppError::TruncatedUpload(format!("Failed to read request body: {}", err))
}

//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`. Use
//! `AppError` (or types that implement `Into<AppError>`) for errors and `?` so they become
//! `HttpAppError` and render consistently (status, body, logging).

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thumbstore_core::{AppError, ErrorMetadata, LogLevel};
use thumbstore_storage::StorageError;

/// Content type of every error body
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=UTF-8";

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from thumbstore-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// Body for errors that only carry a status, e.g. `Failure: 404 Not Found\r\n`.
pub fn failure_message(status: StatusCode) -> String {
    format!(
        "Failure: {} {}\r\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, error_code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, error_code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type,
                error_code,
                details = %error.detailed_message(),
                "Request failed"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = app_error
            .client_message()
            .unwrap_or_else(|| failure_message(status));

        let mut response = (status, body).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(TEXT_PLAIN_UTF8),
        );
        headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
        response
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::NotFound(msg),
            StorageError::NotRegularFile(msg) => AppError::Forbidden(msg),
            StorageError::StagingFailed(msg) => AppError::Persistence(msg),
            StorageError::PublishFailed(msg) => AppError::Persistence(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_from_storage_error_not_found() {
        let storage_err = StorageError::NotFound("File not found".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, "File not found"),
            _ => panic!("Expected NotFound variant"),
        }
    }

    #[test]
    fn test_from_storage_error_invalid_key_hides_existence() {
        let storage_err = StorageError::InvalidKey("../etc/passwd".to_string());
        let HttpAppError(app_err) = storage_err.into();
        assert!(matches!(app_err, AppError::NotFound(_)));
    }

    #[test]
    fn test_from_storage_error_not_regular_file() {
        let storage_err = StorageError::NotRegularFile("fifo".to_string());
        let HttpAppError(app_err) = storage_err.into();
        assert!(matches!(app_err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_from_storage_error_publish_failed() {
        let storage_err = StorageError::PublishFailed("disk full".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::Persistence(msg) => assert_eq!(msg, "disk full"),
            _ => panic!("Expected Persistence variant"),
        }
    }

    #[tokio::test]
    async fn test_error_response_is_plain_text_and_closes() {
        let response =
            HttpAppError(AppError::NotMultipart("application/json".to_string())).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            TEXT_PLAIN_UTF8
        );
        assert_eq!(response.headers().get(header::CONNECTION).unwrap(), "close");
        assert_eq!(body_text(response).await, "Not a multipart request");
    }

    #[test]
    fn test_failure_message_uses_canonical_reason() {
        assert_eq!(
            failure_message(StatusCode::NOT_FOUND),
            "Failure: 404 Not Found\r\n"
        );
        assert_eq!(
            failure_message(StatusCode::FORBIDDEN),
            "Failure: 403 Forbidden\r\n"
        );
        assert_eq!(
            failure_message(StatusCode::PAYLOAD_TOO_LARGE),
            "Failure: 413 Payload Too Large\r\n"
        );
    }

    #[tokio::test]
    async fn test_status_only_error_body() {
        let response = HttpAppError(AppError::MethodNotAllowed("PUT".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_text(response).await,
            "Failure: 405 Method Not Allowed\r\n"
        );
    }
}

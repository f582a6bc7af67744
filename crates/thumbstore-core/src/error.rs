//! Error types module
//!
//! All request-level failures are unified under [`AppError`]. Each variant describes itself
//! through [`ErrorMetadata`] so the HTTP layer can render a terminal response without knowing
//! where the error came from.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like malformed client input
    Debug,
    /// Warning level - for requests that hit a resource problem
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "MALFORMED_MULTIPART")
    fn error_code(&self) -> &'static str;

    /// Plain-text body sent to the client, or `None` when the status line says it all
    fn client_message(&self) -> Option<String>;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing query parameter: {0}")]
    MissingQueryParam(String),

    #[error("Not a multipart request: {0}")]
    NotMultipart(String),

    #[error("Malformed multipart body: {0}")]
    MalformedMultipart(String),

    #[error("Upload ended before part completed: {0}")]
    TruncatedUpload(String),

    #[error("Upload contained no file part")]
    NoFilePart,

    #[error("Failed to persist upload: {0}")]
    Persistence(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::MissingQueryParam(_) => (400, "MISSING_QUERY_PARAM", LogLevel::Debug),
        AppError::NotMultipart(_) => (400, "NOT_MULTIPART", LogLevel::Debug),
        AppError::MalformedMultipart(_) => (400, "MALFORMED_MULTIPART", LogLevel::Debug),
        AppError::TruncatedUpload(_) => (400, "TRUNCATED_UPLOAD", LogLevel::Warn),
        AppError::NoFilePart => (400, "NO_FILE_PART", LogLevel::Debug),
        AppError::Persistence(_) => (400, "PERSISTENCE_FAILED", LogLevel::Error),
        AppError::NotFound(_) => (404, "NOT_FOUND", LogLevel::Debug),
        AppError::Forbidden(_) => (403, "FORBIDDEN", LogLevel::Warn),
        AppError::MethodNotAllowed(_) => (405, "METHOD_NOT_ALLOWED", LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", LogLevel::Warn),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for log fields
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MissingQueryParam(_) => "MissingQueryParam",
            AppError::NotMultipart(_) => "NotMultipart",
            AppError::MalformedMultipart(_) => "MalformedMultipart",
            AppError::TruncatedUpload(_) => "TruncatedUpload",
            AppError::NoFilePart => "NoFilePart",
            AppError::Persistence(_) => "Persistence",
            AppError::NotFound(_) => "NotFound",
            AppError::Forbidden(_) => "Forbidden",
            AppError::MethodNotAllowed(_) => "MethodNotAllowed",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> Option<String> {
        let message = match self {
            AppError::MissingQueryParam(ref param) => format!("{} query param not found", param),
            AppError::NotMultipart(_) => "Not a multipart request".to_string(),
            AppError::MalformedMultipart(_) => "Failed to decode file data".to_string(),
            AppError::TruncatedUpload(_) => "Unknown error occurred".to_string(),
            AppError::NoFilePart => "No file part in upload".to_string(),
            AppError::Persistence(_) => "Unexpected error occurred".to_string(),
            _ => return None,
        };
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages_for_upload_errors() {
        assert_eq!(
            AppError::NotMultipart("text/plain".to_string()).client_message(),
            Some("Not a multipart request".to_string())
        );
        assert_eq!(
            AppError::MalformedMultipart("bad header".to_string()).client_message(),
            Some("Failed to decode file data".to_string())
        );
        assert_eq!(
            AppError::TruncatedUpload("eof".to_string()).client_message(),
            Some("Unknown error occurred".to_string())
        );
        assert_eq!(
            AppError::Persistence("disk full".to_string()).client_message(),
            Some("Unexpected error occurred".to_string())
        );
    }

    #[test]
    fn test_missing_query_param_message() {
        let err = AppError::MissingQueryParam("file".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(
            err.client_message().as_deref(),
            Some("file query param not found")
        );
    }

    #[test]
    fn test_status_only_errors_have_no_message() {
        let err = AppError::NotFound("missing.txt".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.client_message(), None);

        let err = AppError::MethodNotAllowed("PUT".to_string());
        assert_eq!(err.http_status_code(), 405);
        assert_eq!(err.client_message(), None);

        assert_eq!(AppError::Forbidden("fifo".to_string()).client_message(), None);
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::from(anyhow::anyhow!("root cause").context("outer"));
        let details = err.detailed_message();
        assert!(details.contains("Internal error with source"));
        assert!(details.contains("outer"));
    }
}

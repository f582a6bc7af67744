//! Download path: resolve a requested name and stream the file back.

use axum::body::Body;
use futures::StreamExt;
use http::header::CONNECTION;
use http::{HeaderMap, Version};
use std::io::SeekFrom;
use std::sync::Arc;
use std::time::Instant;
use thumbstore_core::constants::DOWNLOAD_CHUNK_SIZE;
use thumbstore_core::media_types::content_type_for_filename;
use thumbstore_core::AppError;
use thumbstore_storage::{Storage, StorageError};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

/// A byte range of an open file to be sent as a response body.
#[derive(Debug)]
pub struct FileRegion {
    pub file: tokio::fs::File,
    pub offset: u64,
    pub length: u64,
}

impl FileRegion {
    /// Stream the region in fixed-size chunks, logging progress as it goes.
    pub async fn into_body(mut self, name: String) -> Result<Body, AppError> {
        if self.offset > 0 {
            self.file.seek(SeekFrom::Start(self.offset)).await?;
        }

        let length = self.length;
        let reader = self.file.take(length);
        let mut sent: u64 = 0;
        let start = Instant::now();

        let stream = ReaderStream::with_capacity(reader, DOWNLOAD_CHUNK_SIZE).map(move |chunk| {
            match &chunk {
                Ok(bytes) => {
                    sent += bytes.len() as u64;
                    tracing::debug!(file = %name, sent, total = length, "Download progress");
                    if sent == length {
                        tracing::info!(
                            file = %name,
                            size_bytes = length,
                            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                            "Download complete"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, sent, total = length, "Download aborted");
                }
            }
            chunk
        });

        Ok(Body::from_stream(stream))
    }
}

/// A file that passed validation and is ready to be sent.
#[derive(Debug)]
pub struct PreparedDownload {
    pub name: String,
    pub content_type: &'static str,
    pub region: FileRegion,
}

/// Validates requested names and opens the files behind them.
#[derive(Clone)]
pub struct DownloadStreamer {
    storage: Arc<dyn Storage>,
}

impl DownloadStreamer {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        DownloadStreamer { storage }
    }

    /// Open `name` for download.
    ///
    /// Names outside the root, hidden names, directories and missing files are `NotFound`;
    /// special files are `Forbidden`.
    pub async fn prepare(&self, name: &str) -> Result<PreparedDownload, AppError> {
        let stored = self.storage.open(name).await.map_err(|e| match e {
            StorageError::NotFound(_) | StorageError::InvalidKey(_) => {
                AppError::NotFound(e.to_string())
            }
            StorageError::NotRegularFile(_) => AppError::Forbidden(e.to_string()),
            other => AppError::Internal(other.to_string()),
        })?;

        Ok(PreparedDownload {
            content_type: content_type_for_filename(&stored.name),
            name: stored.name,
            region: FileRegion {
                file: stored.file,
                offset: 0,
                length: stored.len,
            },
        })
    }
}

/// Whether the client asked for the connection to stay open after this response.
///
/// HTTP/1.1 is persistent unless `Connection: close` is sent; HTTP/1.0 only with an explicit
/// `Connection: keep-alive`.
pub fn is_keep_alive(version: Version, headers: &HeaderMap) -> bool {
    let has_token = |token: &str| {
        headers
            .get_all(CONNECTION)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .any(|t| t.trim().eq_ignore_ascii_case(token))
    };

    match version {
        Version::HTTP_11 => !has_token("close"),
        Version::HTTP_10 => has_token("keep-alive"),
        _ => false,
    }
}

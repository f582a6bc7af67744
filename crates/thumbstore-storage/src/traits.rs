//! Storage abstraction trait
//!
//! This module defines the Storage trait that the upload and download pipelines work against.

use crate::staging::StagedFile;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Staging failed: {0}")]
    StagingFailed(String),

    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Not a regular file: {0}")]
    NotRegularFile(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stored file opened for reading, with its length captured at open time.
#[derive(Debug)]
pub struct StoredFile {
    pub name: String,
    pub path: PathBuf,
    pub file: tokio::fs::File,
    pub len: u64,
}

/// Storage abstraction trait
///
/// Names passed to these methods are flat file names relative to the storage root. Every
/// method resolves them through the same traversal checks, so no name can reach a path
/// outside the root.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Root directory all names resolve under
    fn root(&self) -> &Path;

    /// Create a hidden staged file that is removed unless published
    async fn stage(&self) -> StorageResult<StagedFile>;

    /// Sync a staged file and rename it to `name`. Fails rather than overwrite.
    async fn publish(&self, staged: StagedFile, name: &str) -> StorageResult<PathBuf>;

    /// Write `data` under `name` using the same stage-then-publish discipline
    async fn write_atomic(&self, name: &str, data: Bytes) -> StorageResult<PathBuf>;

    /// Open a visible regular file for download
    ///
    /// Hidden names, directories and missing files yield `NotFound`; special files yield
    /// `NotRegularFile`.
    async fn open(&self, name: &str) -> StorageResult<StoredFile>;

    /// Remove a published file. Removing a name that does not exist is not an error.
    async fn delete(&self, name: &str) -> StorageResult<()>;
}

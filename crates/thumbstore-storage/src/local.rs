use crate::staging::StagedFile;
use crate::traits::{Storage, StorageError, StorageResult, StoredFile};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_canonical: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "uploads"), created if missing
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let base_canonical = fs::canonicalize(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        Ok(LocalStorage {
            base_path,
            base_canonical,
        })
    }

    /// Convert a flat name to a filesystem path with security validation
    ///
    /// Names must be a single path component. When the target already exists its canonical
    /// form (symlinks resolved) must still live under the storage root.
    fn key_to_path(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty() || name == "." || name == ".." {
            return Err(StorageError::InvalidKey(format!("Invalid name '{}'", name)));
        }

        if name.contains(|c: char| c == '/' || c == '\\' || c == '\0') {
            return Err(StorageError::InvalidKey(
                "Name contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(name);

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&self.base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Name resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

#[async_trait]
impl Storage for LocalStorage {
    fn root(&self) -> &Path {
        &self.base_path
    }

    async fn stage(&self) -> StorageResult<StagedFile> {
        let dir = self.base_path.clone();
        tokio::task::spawn_blocking(move || StagedFile::create_in(&dir))
            .await
            .map_err(|e| StorageError::StagingFailed(format!("Staging task failed: {}", e)))?
            .map_err(|e| {
                StorageError::StagingFailed(format!(
                    "Failed to create staged file in {}: {}",
                    self.base_path.display(),
                    e
                ))
            })
    }

    async fn publish(&self, staged: StagedFile, name: &str) -> StorageResult<PathBuf> {
        let path = self.key_to_path(name)?;
        let start = std::time::Instant::now();

        let (temp_path, size) = staged.finish().await.map_err(|e| {
            StorageError::PublishFailed(format!("Failed to sync staged file: {}", e))
        })?;

        let target = path.clone();
        tokio::task::spawn_blocking(move || temp_path.persist_noclobber(&target))
            .await
            .map_err(|e| StorageError::PublishFailed(format!("Publish task failed: {}", e)))?
            .map_err(|e| {
                StorageError::PublishFailed(format!(
                    "Failed to publish {}: {}",
                    path.display(),
                    e.error
                ))
            })?;

        tracing::info!(
            path = %path.display(),
            name = %name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage publish successful"
        );

        Ok(path)
    }

    async fn write_atomic(&self, name: &str, data: Bytes) -> StorageResult<PathBuf> {
        self.key_to_path(name)?;

        let mut staged = self.stage().await?;
        staged.write_chunk(&data).await.map_err(|e| {
            StorageError::StagingFailed(format!("Failed to write staged file: {}", e))
        })?;

        self.publish(staged, name).await
    }

    async fn open(&self, name: &str) -> StorageResult<StoredFile> {
        let path = self.key_to_path(name)?;

        if is_hidden(name) {
            return Err(StorageError::NotFound(name.to_string()));
        }

        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => return Err(StorageError::IoError(e)),
        };

        if metadata.is_dir() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        if !metadata.is_file() {
            return Err(StorageError::NotRegularFile(name.to_string()));
        }

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => return Err(StorageError::IoError(e)),
        };

        // Length comes from the open handle so it matches the bytes that will be streamed.
        let len = file.metadata().await?.len();

        tracing::debug!(path = %path.display(), name = %name, size_bytes = len, "Opened stored file");

        Ok(StoredFile {
            name: name.to_string(),
            path,
            file,
            len,
        })
    }

    async fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.key_to_path(name)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), name = %name, "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }
}

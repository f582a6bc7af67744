use crate::{LocalStorage, Storage, StorageResult};
use std::sync::Arc;
use thumbstore_core::Config;

/// Create the storage backend described by the configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(config.storage_path()).await?;

    tracing::info!(
        storage_path = %config.storage_path(),
        root = %storage.root().display(),
        "Local storage initialized"
    );

    Ok(Arc::new(storage))
}

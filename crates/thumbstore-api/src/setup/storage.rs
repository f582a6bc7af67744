//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use thumbstore_core::Config;
use thumbstore_storage::{create_storage, Storage};

/// Create the storage root (if missing) and the backend serving it.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config)
        .await
        .with_context(|| format!("Failed to initialize storage at '{}'", config.storage_path()))?;
    tracing::info!(
        root = %storage.root().display(),
        "Storage abstraction initialized successfully"
    );
    Ok(storage)
}

//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use thumbstore_core::Config;

/// Validate critical configuration values
///
/// # Returns
/// Ok(()) if validation passes, Err with details if validation fails
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server_port() == 0 {
        return Err(anyhow::anyhow!("PORT cannot be 0"));
    }

    if config.bind_address().trim().is_empty() {
        return Err(anyhow::anyhow!("BIND_ADDRESS cannot be empty"));
    }

    if config.storage_path().trim().is_empty() {
        return Err(anyhow::anyhow!("STORAGE_PATH cannot be empty"));
    }

    if config.max_upload_size_bytes() == 0 {
        return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
    }

    if config.is_production() && config.max_upload_size_bytes() > 1024 * 1024 * 1024 {
        tracing::warn!(
            max_upload_size_bytes = config.max_upload_size_bytes(),
            "Upload limit above 1 GiB in production - uploads are staged on the storage disk"
        );
    }

    Ok(())
}

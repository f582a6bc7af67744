//! Thumbnail derivation for stored images

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thumbstore_processing::Thumbnailer;
use thumbstore_storage::keys::thumbnail_name;
use thumbstore_storage::Storage;

/// Renders and stores `{base}_thumb{extension}` next to a stored image.
#[derive(Clone)]
pub struct ThumbnailGenerator {
    storage: Arc<dyn Storage>,
}

impl ThumbnailGenerator {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        ThumbnailGenerator { storage }
    }

    /// Generate a thumbnail for the stored file at `source`.
    ///
    /// Returns the thumbnail's stored name, or `None` when rendering or storing fails. Failures
    /// are logged and never propagated.
    #[tracing::instrument(skip(self, source), fields(source = %source.display()))]
    pub async fn generate(&self, source: &Path, base: &str, extension: &str) -> Option<String> {
        let name = thumbnail_name(base, extension);
        let start = std::time::Instant::now();

        let source_path: PathBuf = source.to_path_buf();
        let ext = extension.to_string();
        let rendered =
            tokio::task::spawn_blocking(move || Thumbnailer::render_file(&source_path, &ext))
                .await;

        let data = match rendered {
            Ok(Ok(data)) => data,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, thumbnail = %name, "Thumbnail rendering failed");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, thumbnail = %name, "Thumbnail task failed");
                return None;
            }
        };

        let size_bytes = data.len();
        match self.storage.write_atomic(&name, data).await {
            Ok(_) => {
                tracing::info!(
                    thumbnail = %name,
                    size_bytes,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Thumbnail stored"
                );
                Some(name)
            }
            Err(e) => {
                tracing::warn!(error = %e, thumbnail = %name, "Failed to store thumbnail");
                None
            }
        }
    }
}

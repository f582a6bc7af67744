//! Publishing of completed upload parts

use crate::services::upload::thumbnail::ThumbnailGenerator;
use crate::services::upload::types::{UploadPart, UploadResult};
use std::sync::Arc;
use thumbstore_core::media_types::is_thumbnail_extension;
use thumbstore_core::AppError;
use thumbstore_storage::keys::{extension_of, generate_base_name, stored_name};
use thumbstore_storage::Storage;

/// Moves completed parts to their final names and derives thumbnails for images.
#[derive(Clone)]
pub struct FilePersistenceWriter {
    storage: Arc<dyn Storage>,
    thumbnails: ThumbnailGenerator,
}

impl FilePersistenceWriter {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        FilePersistenceWriter {
            thumbnails: ThumbnailGenerator::new(storage.clone()),
            storage,
        }
    }

    /// Publish `part` as `{uuid}{extension}` and, for image extensions, generate its thumbnail.
    pub async fn persist(&self, part: UploadPart) -> Result<UploadResult, AppError> {
        let extension = extension_of(&part.filename).to_string();
        let base = generate_base_name();
        let name = stored_name(&base, &extension);

        let field_name = part.field_name.clone();
        let original_filename = part.filename.clone();
        let size_bytes = part.size();

        let path = self
            .storage
            .publish(part.into_content(), &name)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        tracing::info!(
            field = %field_name,
            original_filename = %original_filename,
            stored_name = %name,
            size_bytes,
            "Upload stored"
        );

        let thumb = if is_thumbnail_extension(&extension) {
            self.thumbnails.generate(&path, &base, &extension).await
        } else {
            None
        };

        Ok(UploadResult { file: name, thumb })
    }

    /// Publish every part in order. If any part fails, the files already published for this
    /// request are deleted again before the error is returned.
    pub async fn persist_all(&self, parts: Vec<UploadPart>) -> Result<Vec<UploadResult>, AppError> {
        let mut results = Vec::with_capacity(parts.len());
        let mut parts = parts.into_iter();

        while let Some(part) = parts.next() {
            match self.persist(part).await {
                Ok(result) => results.push(result),
                Err(err) => {
                    // Unpublished parts are still staged and are removed on drop.
                    drop(parts);
                    self.discard(&results).await;
                    return Err(err);
                }
            }
        }

        Ok(results)
    }

    /// Delete published files and their thumbnails. Failures are logged.
    pub async fn discard(&self, results: &[UploadResult]) {
        let names = results
            .iter()
            .flat_map(|result| std::iter::once(&result.file).chain(result.thumb.as_ref()))
            .collect::<Vec<&String>>();

        for name in names {
            if let Err(e) = self.storage.delete(name).await {
                tracing::error!(error = %e, name = %name, "Failed to discard published upload");
            }
        }
    }
}

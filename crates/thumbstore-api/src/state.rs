//! Application state shared by all handlers.

use crate::services::download::DownloadStreamer;
use crate::services::upload::FilePersistenceWriter;
use std::sync::Arc;
use thumbstore_storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub uploads: FilePersistenceWriter,
    pub downloads: DownloadStreamer,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        AppState {
            uploads: FilePersistenceWriter::new(storage.clone()),
            downloads: DownloadStreamer::new(storage.clone()),
            storage,
        }
    }
}

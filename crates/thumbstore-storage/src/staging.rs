//! Staged files: content that is being written and is not yet visible under a final name.

use std::io;
use std::path::Path;
use tempfile::TempPath;
use thumbstore_core::constants::STAGING_PREFIX;
use tokio::io::AsyncWriteExt;

/// A hidden file under the storage root that receives upload content.
///
/// Dropping a `StagedFile` without publishing it deletes the file from disk.
#[derive(Debug)]
pub struct StagedFile {
    file: tokio::fs::File,
    path: TempPath,
    size: u64,
}

impl StagedFile {
    pub(crate) fn create_in(dir: &Path) -> io::Result<Self> {
        let (file, path) = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(dir)?
            .into_parts();

        Ok(StagedFile {
            file: tokio::fs::File::from_std(file),
            path,
            size: 0,
        })
    }

    /// Append a chunk of content
    pub async fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data).await?;
        self.size += data.len() as u64;
        Ok(())
    }

    /// Bytes written so far
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Current on-disk location of the staged content
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and sync the content, closing the handle. The returned path still deletes the
    /// file on drop.
    pub(crate) async fn finish(mut self) -> io::Result<(TempPath, u64)> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok((self.path, self.size))
    }
}

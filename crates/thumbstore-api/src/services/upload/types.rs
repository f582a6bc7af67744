//! Types used by the upload pipeline

use serde::Serialize;
use thumbstore_storage::StagedFile;

/// Completion state of an upload part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartState {
    InProgress,
    Completed,
}

/// A file field being received, or fully received and waiting to be published.
///
/// The content lives in a hidden staged file; dropping the part without publishing it
/// removes that file.
#[derive(Debug)]
pub struct UploadPart {
    pub field_name: String,
    /// Filename as declared by the uploader. Only its extension is ever used for storage.
    pub filename: String,
    pub content_type: Option<String>,
    pub(crate) state: PartState,
    pub(crate) content: StagedFile,
}

impl UploadPart {
    pub fn state(&self) -> PartState {
        self.state
    }

    /// Bytes received so far
    pub fn size(&self) -> u64 {
        self.content.size()
    }

    pub(crate) fn into_content(self) -> StagedFile {
        self.content
    }
}

/// Names stored for one uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

/// Response body: a single object for one file part, an array in part order otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Single(UploadResult),
    Multiple(Vec<UploadResult>),
}

impl UploadResponse {
    /// `None` when the upload carried no file part.
    pub fn from_results(mut results: Vec<UploadResult>) -> Option<Self> {
        match results.len() {
            0 => None,
            1 => results.pop().map(UploadResponse::Single),
            _ => Some(UploadResponse::Multiple(results)),
        }
    }
}

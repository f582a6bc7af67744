//! Upload pipeline
//!
//! Body chunks flow through a [`DecodeSession`], which stages each file part as it arrives.
//! Once the whole body has been decoded, the completed parts are handed to the
//! [`FilePersistenceWriter`], which publishes them under generated names and asks the
//! [`ThumbnailGenerator`] for a thumbnail when the extension is an image type.

pub mod session;
pub mod thumbnail;
pub mod types;
pub mod writer;

pub use session::{boundary_from_content_type, DecodeSession, Decoded};
pub use thumbnail::ThumbnailGenerator;
pub use types::{PartState, UploadPart, UploadResponse, UploadResult};
pub use writer::FilePersistenceWriter;

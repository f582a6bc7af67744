//! Thumbstore Storage Library
//!
//! This crate provides the storage abstraction used by the upload and download pipelines,
//! and its local filesystem implementation.
//!
//! # Name format
//!
//! The storage root is flat. Every stored file lives directly under it:
//!
//! - **Uploads**: `{uuid}{extension}`
//! - **Thumbnails**: `{uuid}_thumb{extension}`
//! - **In-progress uploads**: `.upload-*` (hidden, never served)
//!
//! Names must be a single path component. Name generation is centralized in the `keys`
//! module.

pub mod factory;
pub mod keys;
pub mod local;
pub(crate) mod staging;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use local::LocalStorage;
pub use staging::StagedFile;
pub use traits::{Storage, StorageError, StorageResult, StoredFile};

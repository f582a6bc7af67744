//! Thumbstore API Library
//!
//! This crate provides the HTTP handlers, upload and download services, and application setup
//! for the thumbstore server.

// Module declarations
mod handlers;
pub mod services;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::HttpAppError;
pub use services::download::{DownloadStreamer, FileRegion};
pub use services::upload::{DecodeSession, FilePersistenceWriter, UploadResult};
pub use state::AppState;

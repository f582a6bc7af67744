//! Thumbstore Core Library
//!
//! Configuration, error types, constants and the static media type tables shared by the
//! storage, processing and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod media_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, LogFormat, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};

//! Thumbstore Media Processing Library
//!
//! This crate renders the fixed-size thumbnails stored next to uploaded images.

pub mod error;
pub mod image;

// Re-export commonly used types
pub use error::ThumbnailError;
pub use self::image::{ImageResize, Thumbnailer};

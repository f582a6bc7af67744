//! Image processing module
//!
//! - Resize filter selection and exact resizing (resize)
//! - Fixed-size thumbnail rendering (thumbnail)

pub mod resize;
pub mod thumbnail;

pub use resize::ImageResize;
pub use thumbnail::Thumbnailer;

use thiserror::Error;

/// Thumbnail rendering errors
#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Unsupported thumbnail extension: '{0}'")]
    UnsupportedExtension(String),

    #[error("Failed to read source image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode source image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode thumbnail: {0}")]
    Encode(#[source] image::ImageError),
}

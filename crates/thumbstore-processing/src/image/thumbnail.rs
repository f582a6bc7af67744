//! Fixed-size thumbnail rendering
//!
//! A thumbnail is the source image stretched to exactly
//! [`THUMBNAIL_WIDTH`]×[`THUMBNAIL_HEIGHT`] and re-encoded in the format named by the source
//! file's extension. The source bytes are sniffed rather than trusted, so a PNG uploaded as
//! `scan.jpg` still renders, and is written out as JPEG.

use crate::error::ThumbnailError;
use crate::image::resize::ImageResize;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;
use thumbstore_core::constants::{THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH};

/// Renders thumbnails. All methods are CPU-bound and blocking.
pub struct Thumbnailer;

impl Thumbnailer {
    /// Output format for an extension (with or without the leading dot, any case)
    pub fn format_for_extension(extension: &str) -> Result<ImageFormat, ThumbnailError> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "gif" => Ok(ImageFormat::Gif),
            _ => Err(ThumbnailError::UnsupportedExtension(extension.to_string())),
        }
    }

    /// Render a thumbnail from in-memory image data
    pub fn render(data: &[u8], extension: &str) -> Result<Bytes, ThumbnailError> {
        let format = Self::format_for_extension(extension)?;

        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .decode()
            .map_err(ThumbnailError::Decode)?;

        let thumb = ImageResize::resize_exact(&img, THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT);

        // JPEG has no alpha channel, GIF frames are encoded from RGBA.
        let thumb = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(thumb.to_rgb8()),
            ImageFormat::Gif => DynamicImage::ImageRgba8(thumb.to_rgba8()),
            _ => thumb,
        };

        let mut buffer = Vec::with_capacity((THUMBNAIL_WIDTH * THUMBNAIL_HEIGHT * 3) as usize);
        thumb
            .write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(ThumbnailError::Encode)?;

        tracing::debug!(
            source_width = img.width(),
            source_height = img.height(),
            format = ?format,
            size_bytes = buffer.len(),
            "Rendered thumbnail"
        );

        Ok(Bytes::from(buffer))
    }

    /// Render a thumbnail from an image file on disk
    pub fn render_file(path: &Path, extension: &str) -> Result<Bytes, ThumbnailError> {
        Self::format_for_extension(extension)?;
        let data = std::fs::read(path)?;
        Self::render(&data, extension)
    }
}

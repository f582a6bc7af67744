//! Static extension tables: which uploads get thumbnails and which content type a download
//! is served with.

/// Extensions (lowercase, without dot) that get a thumbnail on upload.
pub const THUMBNAIL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

const CONTENT_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("txt", "text/plain"),
    ("pdf", "application/pdf"),
];

/// Fallback content type for unknown extensions.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

fn strip_dot(extension: &str) -> &str {
    extension.strip_prefix('.').unwrap_or(extension)
}

/// Whether an extension (with or without leading dot) is a thumbnail-eligible raster image.
pub fn is_thumbnail_extension(extension: &str) -> bool {
    let ext = strip_dot(extension);
    THUMBNAIL_EXTENSIONS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(ext))
}

/// Content type for an extension (with or without leading dot).
pub fn content_type_for_extension(extension: &str) -> &'static str {
    let ext = strip_dot(extension);
    CONTENT_TYPES
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Content type for a filename, looked up by the text after its last dot.
pub fn content_type_for_filename(filename: &str) -> &'static str {
    match filename.rsplit_once('.') {
        Some((_, ext)) => content_type_for_extension(ext),
        None => DEFAULT_CONTENT_TYPE,
    }
}

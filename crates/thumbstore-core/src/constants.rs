//! Shared constants

/// Query parameter naming the file to download.
pub const FILE_QUERY_PARAM: &str = "file";

/// Thumbnail width in pixels.
pub const THUMBNAIL_WIDTH: u32 = 100;

/// Thumbnail height in pixels.
pub const THUMBNAIL_HEIGHT: u32 = 100;

/// Suffix inserted between a stored file's base name and its extension for thumbnails.
pub const THUMBNAIL_SUFFIX: &str = "_thumb";

/// Prefix of in-flight staged files. The leading dot keeps them hidden from downloads.
pub const STAGING_PREFIX: &str = ".upload-";

/// Read size used when streaming a file region to the client.
pub const DOWNLOAD_CHUNK_SIZE: usize = 64 * 1024;

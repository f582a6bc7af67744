//! Name generation for stored files.
//!
//! Stored names are `{uuid}{extension}` and thumbnails `{uuid}_thumb{extension}`. The only
//! uploader-controlled text that reaches a stored name is the extension, and only when it is
//! plain ASCII alphanumerics.

use thumbstore_core::constants::THUMBNAIL_SUFFIX;
use uuid::Uuid;

/// Generate a new unique base name.
pub fn generate_base_name() -> String {
    Uuid::new_v4().to_string()
}

/// Extension of an uploaded filename, including the leading dot.
///
/// Only the last path component is considered. Returns an empty string when there is no
/// dot, when the dot is the first character, or when the suffix is not ASCII alphanumeric.
pub fn extension_of(filename: &str) -> &str {
    let last_component = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);

    match last_component.rfind('.') {
        Some(i) if i > 0 => {
            let ext = &last_component[i..];
            if ext.len() > 1 && ext[1..].chars().all(|c| c.is_ascii_alphanumeric()) {
                ext
            } else {
                ""
            }
        }
        _ => "",
    }
}

/// Final stored name for a base name and extension.
pub fn stored_name(base: &str, extension: &str) -> String {
    format!("{}{}", base, extension)
}

/// Thumbnail name for a base name and extension.
pub fn thumbnail_name(base: &str, extension: &str) -> String {
    format!("{}{}{}", base, THUMBNAIL_SUFFIX, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), ".JPG");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("notes"), "");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of("C:\\Users\\me\\scan.png"), ".png");
        assert_eq!(extension_of("dir.d/readme"), "");
        assert_eq!(extension_of("evil.a/../../x"), "");
        assert_eq!(extension_of("weird.p g"), "");
    }

    #[test]
    fn test_names() {
        assert_eq!(stored_name("abc", ".png"), "abc.png");
        assert_eq!(stored_name("abc", ""), "abc");
        assert_eq!(thumbnail_name("abc", ".png"), "abc_thumb.png");
    }

    #[test]
    fn test_generated_base_names_are_unique() {
        let names: HashSet<String> = (0..1000).map(|_| generate_base_name()).collect();
        assert_eq!(names.len(), 1000);
    }
}

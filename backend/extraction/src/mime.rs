//! MIME type handling for uploaded images.

use std::path::Path;

/// Used when an upload carries no content type.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// The MIME type to send upstream: the given one, or [`DEFAULT_IMAGE_MIME`]
/// when absent or blank.
pub fn effective_mime(mime_type: Option<&str>) -> &str {
    match mime_type.map(str::trim) {
        Some(m) if !m.is_empty() => m,
        _ => DEFAULT_IMAGE_MIME,
    }
}

/// Guess an image MIME type from a file extension.
pub fn detect_image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

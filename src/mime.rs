/// Content type for an upload, from the file name first and the magic bytes
/// second.
pub fn content_type_for(file_name: &str, bytes: &[u8]) -> &'static str {
    let by_name = file_name
        .rsplit_once('.')
        .and_then(|(_, ext)| content_type_for_extension(ext));

    by_name.unwrap_or_else(|| detect_image_mime(bytes))
}

pub fn content_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "mp4" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        _ => None,
    }
}

pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        _ => {
            tracing::warn!(
                "Unrecognized file format (first 4 bytes: {:02X?}), sending as application/octet-stream",
                &bytes[..bytes.len().min(4)]
            );
            "application/octet-stream"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        assert_eq!(
            detect_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            "image/png"
        );
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
    }

    #[test]
    fn test_detect_webp() {
        assert_eq!(
            detect_image_mime(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50
            ]),
            "image/webp"
        );
    }

    #[test]
    fn test_unknown_falls_back_to_octet_stream() {
        assert_eq!(
            detect_image_mime(&[0x00, 0x01, 0x02, 0x03]),
            "application/octet-stream"
        );
        assert_eq!(detect_image_mime(&[]), "application/octet-stream");
    }

    #[test]
    fn test_extension_wins_over_bytes() {
        assert_eq!(content_type_for("photo.JPG", &[0x89, 0x50, 0x4E, 0x47]), "image/jpeg");
    }

    #[test]
    fn test_unknown_extension_sniffs_bytes() {
        assert_eq!(content_type_for("photo.heic", &[0x89, 0x50, 0x4E, 0x47]), "image/png");
        assert_eq!(content_type_for("photo", &[0xFF, 0xD8, 0xFF]), "image/jpeg");
    }
}

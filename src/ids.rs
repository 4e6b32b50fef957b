use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the identifier embedded in storage keys.
pub const UPLOAD_ID_LENGTH: usize = 21;

/// Length of the identifier embedded in downloaded file names.
pub const DOWNLOAD_ID_LENGTH: usize = 8;

pub const DEFAULT_EXTENSION: &str = "jpg";

/// Random alphanumeric identifier of the given length.
pub fn generate_id(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Extension of `file_name` without the dot, or `jpg` when there is none.
pub fn file_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && !ext.contains('/') => ext,
        _ => DEFAULT_EXTENSION,
    }
}

/// Storage key for a fresh upload of `file_name`.
pub fn upload_key(file_name: &str) -> String {
    format!(
        "media/{}.{}",
        generate_id(UPLOAD_ID_LENGTH),
        file_extension(file_name)
    )
}

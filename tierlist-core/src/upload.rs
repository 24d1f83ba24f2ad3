//! Upload validation for user-supplied images.
//!
//! Everything here runs before a byte leaves for the image CDN: size
//! bounds, MIME allow-list, extension allow-list, and filename hygiene.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;

/// Maximum accepted upload size: 10 MiB.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Minimum accepted upload size. Anything smaller is an empty or broken file.
pub const MIN_FILE_SIZE: usize = 100;

/// MIME types the CDN relay accepts.
pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Extensions the CDN relay accepts.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Why an upload was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("file exceeds the {max_mb} MB size limit", max_mb = MAX_FILE_SIZE / 1024 / 1024)]
    TooLarge,

    #[error("file is empty or truncated")]
    TooSmall,

    #[error("unsupported content type '{mime}'")]
    UnsupportedType { mime: String },

    #[error("unsupported file extension '{ext}'")]
    UnsupportedExtension { ext: String },
}

/// Validate an image upload before relaying it to the CDN.
///
/// `filename` is optional; when present its extension is checked too.
pub fn validate_image(len: usize, mime: &str, filename: Option<&str>) -> Result<(), UploadError> {
    if len > MAX_FILE_SIZE {
        return Err(UploadError::TooLarge);
    }
    if len < MIN_FILE_SIZE {
        return Err(UploadError::TooSmall);
    }

    if !ALLOWED_IMAGE_TYPES.contains(&mime) {
        return Err(UploadError::UnsupportedType {
            mime: mime.to_owned(),
        });
    }

    if let Some(name) = filename {
        let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Err(UploadError::UnsupportedExtension { ext });
        }
    }

    Ok(())
}

/// Strip path separators and unsafe characters from a filename.
///
/// Keeps alphanumerics, dots, hyphens; whitespace collapses to hyphens.
pub fn sanitize_filename(filename: &str) -> String {
    let mut out = String::with_capacity(filename.len());
    let mut pending_hyphen = false;

    for c in filename.chars() {
        if c == '/' || c == '\\' {
            continue;
        }
        if c.is_whitespace() {
            pending_hyphen = !out.is_empty();
            continue;
        }
        if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
            if pending_hyphen {
                out.push('-');
                pending_hyphen = false;
            }
            for lower in c.to_lowercase() {
                out.push(lower);
            }
        }
    }

    out
}

/// Generate a collision-resistant filename keeping the original extension.
pub fn safe_filename(original: &str) -> String {
    let ext = original
        .rsplit('.')
        .next()
        .filter(|e| !e.is_empty() && *e != original)
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "jpg".to_string());

    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix.to_lowercase(), ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_regular_png() {
        assert!(validate_image(50_000, "image/png", Some("cat.png")).is_ok());
    }

    #[test]
    fn rejects_over_ten_megabytes() {
        let err = validate_image(MAX_FILE_SIZE + 1, "image/png", None).unwrap_err();
        assert_eq!(err, UploadError::TooLarge);
    }

    #[test]
    fn rejects_tiny_files() {
        let err = validate_image(99, "image/png", None).unwrap_err();
        assert_eq!(err, UploadError::TooSmall);
        // 100 bytes is the floor, inclusive
        assert!(validate_image(100, "image/png", None).is_ok());
    }

    #[test]
    fn rejects_disallowed_mime() {
        let err = validate_image(50_000, "application/pdf", None).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
    }

    #[test]
    fn rejects_disallowed_extension() {
        let err = validate_image(50_000, "image/png", Some("evil.svg")).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedExtension { .. }));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(validate_image(50_000, "image/jpeg", Some("photo.JPG")).is_ok());
    }

    #[test]
    fn sanitize_strips_path_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd.png"), "....etcpasswd.png");
        assert!(!sanitize_filename("..\\windows\\system32.gif").contains('\\'));
    }

    #[test]
    fn sanitize_hyphenates_spaces_and_lowercases() {
        assert_eq!(sanitize_filename("My Cool Photo.PNG"), "my-cool-photo.png");
    }

    #[test]
    fn sanitize_drops_special_characters() {
        assert_eq!(sanitize_filename("a<b>c|d?.png"), "abcd.png");
    }

    #[test]
    fn safe_filename_keeps_extension() {
        let name = safe_filename("vacation.WEBP");
        assert!(name.ends_with(".webp"));
        assert!(!name.starts_with('.'));
    }

    #[test]
    fn safe_filename_defaults_to_jpg() {
        let name = safe_filename("noextension");
        assert!(name.ends_with(".jpg"));
    }
}

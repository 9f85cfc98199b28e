//! Disk-backed image storage. Filenames are derived from the upload
//! timestamp so concurrent uploads do not collide on the original name.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;

use crate::error::{AppError, AppResult};

/// Fixed ceiling on accepted uploads (10MB).
pub const MAX_IMAGE_BYTES: usize = 10_000_000;

const ALLOWED_EXTENSIONS: [&str; 6] = ["jpeg", "jpg", "png", "gif", "bmp", "webp"];
const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/webp",
];

/// Lower-cased extension of `filename` if it is on the raster-image
/// allow-list, `None` otherwise.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

pub fn allowed_mime(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}

/// `<millis-since-epoch>.<ext>`, mirroring the collision-avoidance scheme
/// of the upload store.
pub fn generated_name(extension: &str) -> String {
    format!("{}.{}", Utc::now().timestamp_millis(), extension)
}

/// Reject names that could escape the upload directory.
pub fn sanitize_name(name: &str) -> AppResult<&str> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
    {
        return Err(AppError::BadRequest("Invalid image name".into()));
    }
    Ok(name)
}

pub fn stored_path(upload_dir: &str, name: &str) -> PathBuf {
    Path::new(upload_dir).join(name)
}

pub async fn file_exists(path: &Path) -> bool {
    fs::metadata(path).await.is_ok()
}

pub async fn save_file(upload_dir: &str, name: &str, bytes: &[u8]) -> AppResult<()> {
    fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    fs::write(stored_path(upload_dir, name), bytes)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(())
}

pub async fn remove_file(path: &Path) -> AppResult<()> {
    fs::remove_file(path)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(())
}

/// Content type for serving a stored file back, guessed from the name.
pub fn content_type_for(name: &str) -> &'static str {
    match Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpeg") | Some("jpg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_raster_image_extensions() {
        assert_eq!(allowed_extension("photo.png").as_deref(), Some("png"));
        assert_eq!(allowed_extension("PHOTO.JPG").as_deref(), Some("jpg"));
        assert_eq!(allowed_extension("banner.webp").as_deref(), Some("webp"));
    }

    #[test]
    fn rejects_non_image_extensions() {
        assert_eq!(allowed_extension("doc.pdf"), None);
        assert_eq!(allowed_extension("script.sh"), None);
        assert_eq!(allowed_extension("noextension"), None);
    }

    #[test]
    fn generated_name_keeps_extension_and_timestamp_stem() {
        let name = generated_name("png");
        assert!(name.ends_with(".png"));
        let stem = name.trim_end_matches(".png");
        assert!(stem.parse::<i64>().is_ok());
    }

    #[test]
    fn sanitize_rejects_traversal() {
        assert!(sanitize_name("../etc/passwd").is_err());
        assert!(sanitize_name("a/b.png").is_err());
        assert!(sanitize_name("").is_err());
        assert!(sanitize_name("1700000000000.png").is_ok());
    }

    #[test]
    fn content_type_guess() {
        assert_eq!(content_type_for("x.jpg"), "image/jpeg");
        assert_eq!(content_type_for("x.bin"), "application/octet-stream");
    }
}

//! Product image uploads.
//!
//! Images land in a flat directory served statically under `/uploads`,
//! referenced by filename only. Names are a timestamp plus the sanitized
//! original name; collisions are not otherwise guarded against.

use std::path::Path;

use chrono::Utc;

use crate::error::{AppError, Result};

/// Store uploaded bytes and return the filename to reference them by.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub async fn save_upload(uploads_dir: &Path, original_name: &str, bytes: &[u8]) -> Result<String> {
    let filename = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize(original_name)
    );

    let path = uploads_dir.join(&filename);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store upload: {e}")))?;

    Ok(filename)
}

/// Strip everything from a client-supplied filename except alphanumerics,
/// dots, dashes and underscores. Path separators go away with the rest,
/// so the result cannot escape the uploads directory.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_ordinary_names() {
        assert_eq!(sanitize("sneaker-01.png"), "sneaker-01.png");
        assert_eq!(sanitize("photo_2.jpeg"), "photo_2.jpeg");
    }

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize("a/b\\c.png"), "abc.png");
    }

    #[test]
    fn test_sanitize_falls_back_when_nothing_survives() {
        assert_eq!(sanitize("???"), "upload");
        assert_eq!(sanitize(""), "upload");
    }
}

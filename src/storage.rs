use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;

const MAX_FILE_NAME_CHARS: usize = 100;

/// Uploaded files on local disk, one sub-directory per category.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        UploadStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` to `<root>/<category>/<uuid>_<name>` and returns the
    /// sanitized display name together with the stored path.
    pub async fn save(
        &self,
        category: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<(String, PathBuf), ApiError> {
        let dir = self.root.join(category);
        fs::create_dir_all(&dir).await?;

        let file_name = sanitize_file_name(original_name);
        let path = dir.join(format!("{}_{}", Uuid::new_v4().simple(), file_name));

        fs::write(&path, bytes).await?;
        info!("Stored upload {} ({} bytes) at {}", file_name, bytes.len(), path.display());

        Ok((file_name, path))
    }

    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, ApiError> {
        if !path.starts_with(&self.root) {
            warn!("Refusing to read file outside upload root: {}", path.display());
            return Err(ApiError::not_found("File"));
        }

        match fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::not_found("File")),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort removal; a file that is already gone is only logged.
    pub async fn remove(&self, path: &Path) {
        if !path.starts_with(&self.root) {
            warn!("Refusing to remove file outside upload root: {}", path.display());
            return;
        }

        if let Err(e) = fs::remove_file(path).await {
            warn!("Failed to remove stored file {}: {}", path.display(), e);
        }
    }
}

/// Keeps only the last path component and the characters `[A-Za-z0-9._-]` and
/// CJK ideographs. Leading dots are dropped so the result is never hidden or `..`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') || is_cjk(*c))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        return "file".to_string();
    }

    // Keep the tail so the extension survives truncation
    let count = cleaned.chars().count();
    if count > MAX_FILE_NAME_CHARS {
        cleaned.chars().skip(count - MAX_FILE_NAME_CHARS).collect()
    } else {
        cleaned.to_string()
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c as u32, 0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("notes.pdf"), "notes.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\真题 2024.pdf"), "真题2024.pdf");
        assert_eq!(sanitize_file_name("..hidden"), "hidden");
        assert_eq!(sanitize_file_name("a b&c?.docx"), "abc.docx");
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name("../"), "file");
        assert_eq!(sanitize_file_name("???"), "file");
    }

    #[test]
    fn test_sanitize_keeps_extension_when_truncating() {
        let long = format!("{}.xlsx", "a".repeat(300));
        let sanitized = sanitize_file_name(&long);
        assert_eq!(sanitized.chars().count(), MAX_FILE_NAME_CHARS);
        assert!(sanitized.ends_with(".xlsx"));
    }

    #[tokio::test]
    async fn test_save_read_and_remove() {
        let root = std::env::temp_dir().join(format!("xueling-upload-test-{}", Uuid::new_v4()));
        let store = UploadStore::new(&root);

        let (file_name, path) = store
            .save("resources", "math notes.pdf", b"%PDF-1.4")
            .await
            .expect("file should be saved");

        assert_eq!(file_name, "mathnotes.pdf");
        assert!(path.starts_with(root.join("resources")));
        assert_eq!(store.read(&path).await.expect("file should be readable"), b"%PDF-1.4");

        store.remove(&path).await;
        assert!(matches!(store.read(&path).await, Err(ApiError::NotFound(_))));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_read_outside_root_is_refused() {
        let store = UploadStore::new("/nonexistent-upload-root");
        let result = store.read(Path::new("/etc/hostname")).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}

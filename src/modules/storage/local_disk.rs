use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::BlobStorage;
use crate::core::error::{AppError, Result};

/// Stores files below a root directory that is served under `public_url`.
pub struct LocalDiskStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a relative storage path below the root, refusing traversal
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

        if path.is_empty() || !is_plain {
            return Err(AppError::Storage(format!("Invalid storage path '{}'", path)));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStorage for LocalDiskStorage {
    async fn put(&self, path: &str, data: Vec<u8>, _content_type: &str) -> Result<String> {
        let target = self.resolve(path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        tokio::fs::write(&target, &data).await.map_err(|e| {
            AppError::Storage(format!("Failed to write file '{}': {}", target.display(), e))
        })?;

        debug!("Stored {} bytes at '{}'", data.len(), target.display());
        Ok(path.to_string())
    }

    fn url(&self, stored_path: &str) -> String {
        format!("{}/{}", self.public_url, stored_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_writes_below_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDiskStorage::new(dir.path(), "/storage/");

        let stored = storage
            .put("uploads/product/1_a.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(stored, "uploads/product/1_a.png");
        let written = std::fs::read(dir.path().join("uploads/product/1_a.png")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
        assert_eq!(storage.url(&stored), "/storage/uploads/product/1_a.png");
    }

    #[tokio::test]
    async fn test_put_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDiskStorage::new(dir.path(), "/storage");

        let result = storage.put("../escape.png", vec![0], "image/png").await;
        assert!(matches!(result, Err(AppError::Storage(_))));

        let result = storage.put("/etc/passwd", vec![0], "text/plain").await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}

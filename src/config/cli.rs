use crate::domain::ports::ArtifactSource;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Local directory holding the `outputs/` artifacts, also used to write the
/// rendered page.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    pub async fn write_file(&self, path: &str, data: &[u8]) -> Result<PathBuf> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        Ok(full_path)
    }
}

impl ArtifactSource for LocalStorage {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        self.read_file(path).await
    }

    fn describe(&self) -> String {
        self.base_path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::DashboardError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let written = storage
            .write_file("outputs/output_peers.json", b"[\"a@x.com\"]")
            .await
            .unwrap();
        assert!(written.ends_with("outputs/output_peers.json"));

        let body = storage.fetch("outputs/output_peers.json").await.unwrap();
        assert_eq!(body, b"[\"a@x.com\"]");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        let result = storage.fetch("outputs/output_top_papers.json").await;
        assert!(matches!(result, Err(DashboardError::IoError(_))));
    }
}

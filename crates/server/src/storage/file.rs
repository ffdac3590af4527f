use std::path::{Path, PathBuf};

use async_trait::async_trait;
use engine::Library;
use tokio::fs;

use super::{Storage, StorageError};

pub const DEFAULT_DATA_FILE: &str = "data/db.json";

/// JSON document on the local disk.
///
/// A missing file is created holding an empty library. Writes go to a
/// sibling temp file that is then renamed over the target.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        if !fs::try_exists(&self.path).await? {
            tracing::info!("creating empty data file at {}", self.path.display());
            self.write(&Library::default()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn read(&self) -> Result<Library, StorageError> {
        self.ensure().await?;
        let raw = fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn write(&self, library: &Library) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_vec_pretty(library)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        fs::write(&tmp, payload).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.json");
        let storage = FileStorage::new(&path);

        let library = storage.read().await.unwrap();
        assert!(library.is_empty());

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"categories": [], "links": []}));
    }

    #[tokio::test]
    async fn write_then_read_returns_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("db.json"));
        storage.write(&Library::seed()).await.unwrap();
        assert_eq!(storage.read().await.unwrap(), Library::seed());
        assert!(!dir.path().join("db.json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = FileStorage::new(&path).read().await.unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }
}

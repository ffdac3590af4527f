//! Persistence of the whole library document.
//!
//! The gateway never edits the document in place: every mutation reads the
//! current [`Library`], changes it and writes it back in full. [`Documents`]
//! serializes those cycles inside one process.

use async_trait::async_trait;
use engine::{EngineError, Library};
use thiserror::Error;
use tokio::sync::Mutex;

pub use file::FileStorage;
pub use s3::{MirroredStorage, ObjectStore, S3Object, S3Settings};

use crate::ServerError;

mod file;
mod s3;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("object store error: {0}")]
    ObjectStore(String),
}

/// A place the document lives.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn read(&self) -> Result<Library, StorageError>;
    async fn write(&self, library: &Library) -> Result<(), StorageError>;
}

pub struct Documents {
    storage: Box<dyn Storage>,
    lock: Mutex<()>,
}

impl Documents {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            lock: Mutex::new(()),
        }
    }

    pub async fn read(&self) -> Result<Library, ServerError> {
        Ok(self.storage.read().await?)
    }

    pub async fn replace(&self, library: Library) -> Result<(), ServerError> {
        let _guard = self.lock.lock().await;
        self.storage.write(&library).await?;
        Ok(())
    }

    /// Read, apply `change`, write back. Nothing is written when `change`
    /// fails.
    pub async fn update<T, F>(&self, change: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Library) -> Result<T, EngineError> + Send,
        T: Send,
    {
        let _guard = self.lock.lock().await;
        let mut library = self.storage.read().await?;
        let value = change(&mut library)?;
        self.storage.write(&library).await?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use engine::Category;

    use super::*;

    #[tokio::test]
    async fn failed_change_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let documents = Documents::new(FileStorage::new(dir.path().join("db.json")));
        documents.replace(Library::seed()).await.unwrap();

        let result = documents
            .update(|library| {
                library.remove_link("1")?;
                library.remove_category("missing")
            })
            .await;
        assert!(result.is_err());
        assert_eq!(documents.read().await.unwrap(), Library::seed());
    }

    #[tokio::test]
    async fn successful_change_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let documents = Documents::new(FileStorage::new(dir.path().join("db.json")));

        documents
            .update(|library| library.add_category(Category::new("x", "X")).map(|_| ()))
            .await
            .unwrap();
        let library = documents.read().await.unwrap();
        assert_eq!(library.categories, vec![Category::new("x", "X")]);
    }
}

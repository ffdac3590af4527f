//! Object storage backend with a local mirror.
//!
//! Reads prefer the object store. A missing object reads as an empty
//! library; any other failure falls back to the local file. Writes always
//! land in the local file first, and a failed upload is only logged.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{
    Client,
    config::{Builder as S3ConfigBuilder, Credentials},
    error::DisplayErrorContext,
    primitives::ByteStream,
};
use engine::Library;

use super::{FileStorage, Storage, StorageError};

/// One object holding the whole document.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// `Ok(None)` when the object does not exist yet.
    async fn get(&self) -> Result<Option<Vec<u8>>, StorageError>;
    async fn put(&self, body: Vec<u8>) -> Result<(), StorageError>;
    /// `bucket/key`, for logs.
    fn location(&self) -> String;
}

#[derive(Clone, Debug, Default)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    pub key: String,
    /// Custom endpoint for S3-compatible services.
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

pub struct S3Object {
    client: Client,
    bucket: String,
    key: String,
}

impl S3Object {
    /// Build a client from `settings`. Explicit keys win over the default
    /// AWS credential chain.
    pub async fn connect(settings: &S3Settings) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .load()
            .await;
        let mut config = S3ConfigBuilder::from(&shared);
        if let (Some(access), Some(secret)) =
            (&settings.access_key_id, &settings.secret_access_key)
        {
            config = config.credentials_provider(Credentials::new(
                access.clone(),
                secret.clone(),
                None,
                None,
                "linkdeck-settings",
            ));
        }
        if let Some(endpoint) = &settings.endpoint {
            config = config.endpoint_url(endpoint.clone()).force_path_style(true);
        }
        Self {
            client: Client::from_conf(config.build()),
            bucket: settings.bucket.clone(),
            key: settings.key.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Object {
    async fn get(&self) -> Result<Option<Vec<u8>>, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await;
        let output = match response {
            Ok(output) => output,
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .is_some_and(|service| service.is_no_such_key())
                    || err
                        .raw_response()
                        .is_some_and(|raw| raw.status().as_u16() == 404);
                if missing {
                    return Ok(None);
                }
                return Err(StorageError::ObjectStore(
                    DisplayErrorContext(&err).to_string(),
                ));
            }
        };
        let body = output
            .body
            .collect()
            .await
            .map_err(|err| StorageError::ObjectStore(err.to_string()))?;
        Ok(Some(body.into_bytes().to_vec()))
    }

    async fn put(&self, body: Vec<u8>) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|err| StorageError::ObjectStore(DisplayErrorContext(&err).to_string()))?;
        Ok(())
    }

    fn location(&self) -> String {
        format!("{}/{}", self.bucket, self.key)
    }
}

pub struct MirroredStorage {
    local: FileStorage,
    remote: Box<dyn ObjectStore>,
}

impl MirroredStorage {
    pub fn new(local: FileStorage, remote: impl ObjectStore + 'static) -> Self {
        Self {
            local,
            remote: Box::new(remote),
        }
    }

    async fn read_remote(&self) -> Result<Library, StorageError> {
        match self.remote.get().await? {
            Some(body) => Ok(serde_json::from_slice(&body)?),
            None => {
                tracing::info!(
                    "no document at {}, starting empty",
                    self.remote.location()
                );
                Ok(Library::default())
            }
        }
    }
}

#[async_trait]
impl Storage for MirroredStorage {
    async fn read(&self) -> Result<Library, StorageError> {
        match self.read_remote().await {
            Ok(library) => Ok(library),
            Err(err) => {
                tracing::warn!("object store read failed, using local file: {err}");
                self.local.read().await
            }
        }
    }

    async fn write(&self, library: &Library) -> Result<(), StorageError> {
        self.local.write(library).await?;
        let body = serde_json::to_vec_pretty(library)?;
        match self.remote.put(body).await {
            Ok(()) => tracing::debug!("document synced to {}", self.remote.location()),
            Err(err) => tracing::error!("object store write failed, kept local copy: {err}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct FakeObject {
        body: Arc<Mutex<Option<Vec<u8>>>>,
        broken: bool,
    }

    #[async_trait]
    impl ObjectStore for FakeObject {
        async fn get(&self) -> Result<Option<Vec<u8>>, StorageError> {
            if self.broken {
                return Err(StorageError::ObjectStore("unreachable".to_string()));
            }
            Ok(self.body.lock().unwrap().clone())
        }

        async fn put(&self, body: Vec<u8>) -> Result<(), StorageError> {
            if self.broken {
                return Err(StorageError::ObjectStore("unreachable".to_string()));
            }
            *self.body.lock().unwrap() = Some(body);
            Ok(())
        }

        fn location(&self) -> String {
            "fake/db.json".to_string()
        }
    }

    #[tokio::test]
    async fn missing_object_reads_as_empty_library() {
        let dir = tempfile::tempdir().unwrap();
        let local = FileStorage::new(dir.path().join("db.json"));
        local.write(&Library::seed()).await.unwrap();

        let storage = MirroredStorage::new(local, FakeObject::default());
        assert!(storage.read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn writes_reach_both_copies() {
        let dir = tempfile::tempdir().unwrap();
        let local = FileStorage::new(dir.path().join("db.json"));
        let remote = FakeObject::default();
        let storage = MirroredStorage::new(local.clone(), remote.clone());

        storage.write(&Library::seed()).await.unwrap();
        assert_eq!(local.read().await.unwrap(), Library::seed());
        assert_eq!(storage.read().await.unwrap(), Library::seed());
        assert!(remote.body.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn broken_object_store_falls_back_to_local() {
        let dir = tempfile::tempdir().unwrap();
        let local = FileStorage::new(dir.path().join("db.json"));
        let remote = FakeObject {
            broken: true,
            ..Default::default()
        };
        let storage = MirroredStorage::new(local, remote);

        storage.write(&Library::seed()).await.unwrap();
        assert_eq!(storage.read().await.unwrap(), Library::seed());
    }

    #[tokio::test]
    async fn unparseable_object_falls_back_to_local() {
        let dir = tempfile::tempdir().unwrap();
        let local = FileStorage::new(dir.path().join("db.json"));
        local.write(&Library::seed()).await.unwrap();
        let remote = FakeObject::default();
        *remote.body.lock().unwrap() = Some(b"garbage".to_vec());

        let storage = MirroredStorage::new(local, remote);
        assert_eq!(storage.read().await.unwrap(), Library::seed());
    }
}

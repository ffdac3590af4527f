//! Loads the library at startup and keeps the local cache and the server in
//! step with every change.
//!
//! Saving writes the cache file right away and parks the remote write in a
//! single pending slot. The slot fires after a quiet period; a newer save
//! cancels whatever is parked and takes its place, so only the latest library
//! goes over the wire. Every attempt reports a [`WriteOutcome`].

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use engine::{AppStore, Library};
use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
};

use crate::{
    cache::LocalCache,
    client::{Client, ClientError},
    error::Result,
};

/// The server side of persistence.
#[async_trait]
pub trait RemoteSink: Send + Sync + 'static {
    async fn fetch(&self) -> std::result::Result<Library, ClientError>;
    async fn push(&self, library: &Library) -> std::result::Result<(), ClientError>;
}

#[async_trait]
impl RemoteSink for Client {
    async fn fetch(&self) -> std::result::Result<Library, ClientError> {
        self.state_get().await
    }

    async fn push(&self, library: &Library) -> std::result::Result<(), ClientError> {
        self.state_put(library).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Saved,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    Cache,
    Seed,
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub library: Library,
    pub background_image: Option<String>,
    pub background_color: Option<String>,
    pub source: LoadSource,
}

impl Loaded {
    /// A store holding the loaded library and preferences.
    pub fn into_store(self) -> AppStore {
        let mut store = AppStore::new(self.library);
        // Preference setters cannot fail.
        let _ = store.dispatch(engine::Action::SetBackgroundImage(self.background_image));
        let _ = store.dispatch(engine::Action::SetBackgroundColor(self.background_color));
        store
    }
}

pub struct StoreAdapter<R> {
    remote: Arc<R>,
    cache_path: PathBuf,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
    outcomes: UnboundedSender<WriteOutcome>,
}

impl<R: RemoteSink> StoreAdapter<R> {
    pub fn new(
        remote: R,
        cache_path: impl Into<PathBuf>,
        debounce: Duration,
    ) -> (Self, UnboundedReceiver<WriteOutcome>) {
        let (outcomes, rx) = unbounded_channel();
        let adapter = Self {
            remote: Arc::new(remote),
            cache_path: cache_path.into(),
            debounce,
            pending: None,
            outcomes,
        };
        (adapter, rx)
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Server first, then the cache, then the seed content.
    ///
    /// An empty document on the server counts as "nothing there yet".
    pub async fn load(&self) -> Loaded {
        let cache = LocalCache::load(&self.cache_path).unwrap_or_else(|err| {
            tracing::warn!("ignoring unreadable cache {}: {err}", self.cache_path.display());
            LocalCache::default()
        });

        let remote = match self.remote.fetch().await {
            Ok(library) if !library.is_empty() => Some(library),
            Ok(_) => {
                tracing::info!("server holds no library yet");
                None
            }
            Err(err) => {
                tracing::warn!("remote load failed, using local cache: {err}");
                None
            }
        };

        let (library, source) = match remote {
            Some(library) => (library, LoadSource::Remote),
            None if cache.is_empty() => (Library::seed(), LoadSource::Seed),
            None => (cache.library(), LoadSource::Cache),
        };

        Loaded {
            library,
            background_image: cache.background_image,
            background_color: cache.background_color,
            source,
        }
    }

    /// Mirror to the cache now, push to the server after the quiet period.
    pub fn save(&mut self, store: &AppStore) -> Result<()> {
        self.save_local(store)?;
        self.schedule(store.library().clone());
        Ok(())
    }

    pub fn save_local(&self, store: &AppStore) -> Result<()> {
        let mut cache = LocalCache {
            background_image: store.background_image().map(str::to_string),
            background_color: store.background_color().map(str::to_string),
            ..Default::default()
        };
        cache.set_library(store.library());
        cache.save(&self.cache_path)
    }

    /// Park a remote write, replacing any write still waiting.
    pub fn schedule(&mut self, library: Library) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let remote = Arc::clone(&self.remote);
        let outcomes = self.outcomes.clone();
        let debounce = self.debounce;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let outcome = push(remote.as_ref(), &library).await;
            // Nobody listening is fine: the cache already holds the data.
            let _ = outcomes.send(outcome);
        }));
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }

    /// Drop the parked write and push `library` immediately.
    pub async fn flush(&mut self, library: &Library) -> WriteOutcome {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let outcome = push(self.remote.as_ref(), library).await;
        let _ = self.outcomes.send(outcome.clone());
        outcome
    }
}

async fn push<R: RemoteSink>(remote: &R, library: &Library) -> WriteOutcome {
    match remote.push(library).await {
        Ok(()) => {
            tracing::debug!("library pushed to server");
            WriteOutcome::Saved
        }
        Err(err) => {
            tracing::warn!("remote save failed, local copy kept: {err}");
            WriteOutcome::Failed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use engine::{Action, Category};
    use tokio::time::{Instant, timeout};

    use super::*;

    #[derive(Default)]
    struct FakeRemote {
        stored: Option<Library>,
        offline: bool,
        pushes: Mutex<Vec<Library>>,
    }

    #[async_trait]
    impl RemoteSink for Arc<FakeRemote> {
        async fn fetch(&self) -> std::result::Result<Library, ClientError> {
            if self.offline {
                return Err(ClientError::Server("offline".to_string()));
            }
            Ok(self.stored.clone().unwrap_or_default())
        }

        async fn push(&self, library: &Library) -> std::result::Result<(), ClientError> {
            if self.offline {
                return Err(ClientError::Server("offline".to_string()));
            }
            self.pushes.lock().unwrap().push(library.clone());
            Ok(())
        }
    }

    const DEBOUNCE: Duration = Duration::from_millis(400);

    fn adapter(
        remote: &Arc<FakeRemote>,
        dir: &tempfile::TempDir,
    ) -> (StoreAdapter<Arc<FakeRemote>>, UnboundedReceiver<WriteOutcome>) {
        StoreAdapter::new(Arc::clone(remote), dir.path().join("cache.json"), DEBOUNCE)
    }

    fn store_with_category(name: &str) -> AppStore {
        let mut store = AppStore::new(Library::seed());
        store
            .dispatch(Action::AddCategory {
                name: name.to_string(),
            })
            .unwrap();
        store
    }

    #[tokio::test(start_paused = true)]
    async fn save_writes_cache_now_and_server_after_quiet_period() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FakeRemote::default());
        let (mut adapter, mut outcomes) = adapter(&remote, &dir);
        let store = store_with_category("Reading");

        let start = Instant::now();
        adapter.save(&store).unwrap();

        let cached = LocalCache::load(adapter.cache_path()).unwrap();
        assert_eq!(cached.library(), *store.library());
        assert!(adapter.is_pending());

        let early = timeout(DEBOUNCE - Duration::from_millis(1), outcomes.recv()).await;
        assert!(early.is_err());
        assert!(remote.pushes.lock().unwrap().is_empty());

        assert_eq!(outcomes.recv().await, Some(WriteOutcome::Saved));
        assert!(start.elapsed() >= DEBOUNCE);
        assert_eq!(remote.pushes.lock().unwrap().as_slice(), [store.library().clone()]);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_save_replaces_the_pending_write() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FakeRemote::default());
        let (mut adapter, mut outcomes) = adapter(&remote, &dir);

        let stores = ["a", "b", "c"].map(store_with_category);
        for store in &stores {
            adapter.save(store).unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        let last = &stores[2];

        assert_eq!(outcomes.recv().await, Some(WriteOutcome::Saved));
        assert!(timeout(Duration::from_secs(5), outcomes.recv()).await.is_err());

        let pushes = remote.pushes.lock().unwrap();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0], *last.library());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_push_is_reported_and_cache_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FakeRemote {
            offline: true,
            ..Default::default()
        });
        let (mut adapter, mut outcomes) = adapter(&remote, &dir);
        let store = store_with_category("Offline");

        adapter.save(&store).unwrap();
        assert!(matches!(
            outcomes.recv().await,
            Some(WriteOutcome::Failed(_))
        ));
        let cached = LocalCache::load(adapter.cache_path()).unwrap();
        assert_eq!(cached.library(), *store.library());
    }

    #[tokio::test(start_paused = true)]
    async fn flush_cancels_pending_and_pushes_once() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(FakeRemote::default());
        let (mut adapter, mut outcomes) = adapter(&remote, &dir);
        let store = store_with_category("Now");

        adapter.save(&store).unwrap();
        assert_eq!(adapter.flush(store.library()).await, WriteOutcome::Saved);
        assert_eq!(outcomes.recv().await, Some(WriteOutcome::Saved));
        assert!(timeout(Duration::from_secs(5), outcomes.recv()).await.is_err());
        assert_eq!(remote.pushes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn load_prefers_server_then_cache_then_seed() {
        let dir = tempfile::tempdir().unwrap();

        let offline = Arc::new(FakeRemote {
            offline: true,
            ..Default::default()
        });
        let (adapter_offline, _rx) = adapter(&offline, &dir);
        let loaded = adapter_offline.load().await;
        assert_eq!(loaded.source, LoadSource::Seed);
        assert_eq!(loaded.library, Library::seed());

        let mut cache = LocalCache {
            background_image: Some("https://img.example/bg.png".to_string()),
            ..Default::default()
        };
        cache.set_library(&Library::new(vec![Category::new("c", "Cached")], vec![]));
        cache.save(adapter_offline.cache_path()).unwrap();
        let loaded = adapter_offline.load().await;
        assert_eq!(loaded.source, LoadSource::Cache);
        assert_eq!(loaded.library.categories[0].name, "Cached");
        assert_eq!(
            loaded.background_image.as_deref(),
            Some("https://img.example/bg.png")
        );

        let online = Arc::new(FakeRemote {
            stored: Some(Library::seed()),
            ..Default::default()
        });
        let (adapter_online, _rx) = adapter(&online, &dir);
        let loaded = adapter_online.load().await;
        assert_eq!(loaded.source, LoadSource::Remote);
        assert_eq!(loaded.library, Library::seed());
    }

    #[tokio::test]
    async fn loaded_store_clears_unknown_icons() {
        let mut library = Library::seed();
        library.links[0].icon_type = Some("Bogus".to_string());
        let loaded = Loaded {
            library,
            background_image: None,
            background_color: Some("#000".to_string()),
            source: LoadSource::Remote,
        };
        let store = loaded.into_store();
        assert_eq!(store.library().links[0].icon_type, None);
        assert_eq!(store.background_color(), Some("#000"));
    }
}

//! Shared store handle with change notifications.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use log::trace;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;

use crate::KeyValueStore;
use crate::MemoryStore;
use crate::StoreError;

/// Buffered notifications per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 64;

/// A change made through a [`StoreHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The key that changed, or `None` when the whole store was cleared.
    pub key: Option<String>,
    /// The [`SyncedEntry`](crate::SyncedEntry) that wrote the change, if any.
    pub origin: Option<u64>,
}

impl StorageEvent {
    /// Returns `true` if this event may have changed `key`.
    pub fn concerns(&self, key: &str) -> bool {
        self.key.as_deref().is_none_or(|k| k == key)
    }
}

/// Cloneable handle to a key-value store.
///
/// Every write through the handle publishes a [`StorageEvent`] to all
/// subscribers, so views of the same key held by different sessions stay
/// in sync. Clones share the store and the channel.
///
/// # Example
///
/// ```
/// use deeps_store::StoreHandle;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let handle = StoreHandle::memory();
/// let mut events = handle.subscribe();
///
/// handle.set("greeting", "\"hi\"".to_string()).await?;
/// assert_eq!(events.recv().await?.key.as_deref(), Some("greeting"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # }).unwrap();
/// ```
#[derive(Clone)]
pub struct StoreHandle {
    store: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<StorageEvent>,
    origins: Arc<AtomicU64>,
}

impl StoreHandle {
    /// Wrap a store.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Wrap an already shared store.
    pub fn from_arc(store: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            events,
            origins: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A handle over a fresh [`MemoryStore`].
    pub fn memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Subscribe to changes made through this handle or its clones.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }

    /// Announce a change made outside this handle (e.g. another process).
    pub fn notify(&self, key: Option<&str>) {
        self.publish(key.map(str::to_string), None);
    }

    /// A writer id unique among this handle and its clones.
    pub(crate) fn next_origin(&self) -> u64 {
        self.origins.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.store.get(key).await
    }

    pub async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.set_from(key, value, None).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.remove_from(key, None).await
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.clear_from(None).await
    }

    pub(crate) async fn set_from(&self, key: &str, value: String, origin: Option<u64>) -> Result<(), StoreError> {
        self.store.set(key, value).await?;
        self.publish(Some(key.to_string()), origin);
        Ok(())
    }

    pub(crate) async fn remove_from(&self, key: &str, origin: Option<u64>) -> Result<(), StoreError> {
        self.store.remove(key).await?;
        self.publish(Some(key.to_string()), origin);
        Ok(())
    }

    pub(crate) async fn clear_from(&self, origin: Option<u64>) -> Result<(), StoreError> {
        self.store.clear().await?;
        self.publish(None, origin);
        Ok(())
    }

    pub async fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.store.keys().await
    }

    /// Get a typed value, decoding JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Set a typed value, encoding JSON.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value)?;
        self.set(key, text).await
    }

    fn publish(&self, key: Option<String>, origin: Option<u64>) {
        trace!("storage event: {:?} from {:?}", key, origin);
        // No subscribers is fine.
        let _ = self.events.send(StorageEvent { key, origin });
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

//! Typed, synchronised view of one store key.

use log::debug;
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::StorageEvent;
use crate::StoreError;
use crate::StoreHandle;

/// A typed value persisted under one key.
///
/// Reads decode JSON and fall back to the initial value when the key is
/// missing or holds something undecodable. The last read is cached;
/// [`changed`](Self::changed) waits for another writer to touch the key;
/// writes made through this entry never wake it.
///
/// # Example
///
/// ```
/// use deeps_store::{StoreHandle, SyncedEntry};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let handle = StoreHandle::memory();
/// let mut a = SyncedEntry::open(handle.clone(), "todos", Vec::<String>::new()).await;
/// let mut b = SyncedEntry::open(handle, "todos", Vec::<String>::new()).await;
///
/// a.add("buy milk").await?;
/// assert_eq!(b.changed().await?, vec!["buy milk".to_string()]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # }).unwrap();
/// ```
pub struct SyncedEntry<T> {
    handle: StoreHandle,
    key: String,
    initial: T,
    cached: T,
    events: broadcast::Receiver<StorageEvent>,
    origin: u64,
}

impl<T> SyncedEntry<T>
where
    T: Serialize + DeserializeOwned + Clone + PartialEq,
{
    /// Open a view of `key`, reading its current value.
    pub async fn open(handle: StoreHandle, key: impl Into<String>, initial: T) -> Self {
        let events = handle.subscribe();
        let origin = handle.next_origin();
        let mut entry = Self {
            handle,
            key: key.into(),
            cached: initial.clone(),
            initial,
            events,
            origin,
        };
        entry.cached = entry.read().await;
        entry
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The cached value.
    pub fn value(&self) -> &T {
        &self.cached
    }

    /// Re-read the key. Returns `true` if the value changed.
    pub async fn refresh(&mut self) -> bool {
        let latest = self.read().await;
        if latest == self.cached {
            return false;
        }
        self.cached = latest;
        true
    }

    /// Store a new value.
    pub async fn set(&mut self, value: T) -> Result<(), StoreError> {
        let text = serde_json::to_string(&value)?;
        self.handle.set_from(&self.key, text, Some(self.origin)).await?;
        self.cached = value;
        Ok(())
    }

    /// Store a value derived from the current one.
    pub async fn update<F>(&mut self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.cached);
        self.set(next).await
    }

    /// Merge `addition` into the current value.
    ///
    /// Arrays get it appended, objects are shallow-merged with an object
    /// addition, anything else is replaced.
    pub async fn add<V: Serialize>(&mut self, addition: V) -> Result<(), StoreError> {
        let current = serde_json::to_value(&self.cached)?;
        let addition = serde_json::to_value(addition)?;
        let merged = merge(current, addition);
        let next: T = serde_json::from_value(merged)?;
        self.set(next).await
    }

    /// Delete the key; the cached value returns to the initial value.
    pub async fn remove(&mut self) -> Result<(), StoreError> {
        self.handle.remove_from(&self.key, Some(self.origin)).await?;
        self.cached = self.initial.clone();
        Ok(())
    }

    /// Delete every key in the store; the cached value returns to the
    /// initial value.
    pub async fn clear_storage(&mut self) -> Result<(), StoreError> {
        self.handle.clear_from(Some(self.origin)).await?;
        self.cached = self.initial.clone();
        Ok(())
    }

    /// Wait for the next change to this key (or a clear) made by another
    /// writer, then refresh and return the value.
    pub async fn changed(&mut self) -> Result<T, StoreError> {
        loop {
            match self.events.recv().await {
                Ok(event) if event.origin == Some(self.origin) => continue,
                Ok(event) if event.concerns(&self.key) => break,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    debug!("entry '{}' lagged {} events, re-reading", self.key, skipped);
                    break;
                }
                Err(RecvError::Closed) => return Err(StoreError::Closed),
            }
        }
        self.refresh().await;
        Ok(self.cached.clone())
    }

    async fn read(&self) -> T {
        match self.handle.get(&self.key).await {
            Ok(Some(text)) if !text.is_empty() => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    warn!("entry '{}' holds undecodable value: {}", self.key, e);
                    self.initial.clone()
                }
            },
            Ok(_) => self.initial.clone(),
            Err(e) => {
                warn!("failed to read entry '{}': {}", self.key, e);
                self.initial.clone()
            }
        }
    }
}

fn merge(current: Json, addition: Json) -> Json {
    match (current, addition) {
        (Json::Array(mut items), addition) => {
            items.push(addition);
            Json::Array(items)
        }
        (Json::Object(mut fields), Json::Object(extra)) => {
            fields.extend(extra);
            Json::Object(fields)
        }
        (_, addition) => addition,
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SyncedEntry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncedEntry")
            .field("key", &self.key)
            .field("value", &self.cached)
            .finish_non_exhaustive()
    }
}

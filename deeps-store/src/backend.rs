//! Key-value store trait.

use async_trait::async_trait;

use crate::StoreError;

/// Backend trait for string key-value storage.
///
/// Values are opaque text (JSON in practice). Implementations only store;
/// change notifications are the job of [`StoreHandle`](crate::StoreHandle).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value for a key.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set the value for a key.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Delete a key.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Delete every key.
    async fn clear(&self) -> Result<(), StoreError>;

    /// All stored keys.
    async fn keys(&self) -> Result<Vec<String>, StoreError>;
}

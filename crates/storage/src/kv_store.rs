use crate::errors::StorageError;
use async_trait::async_trait;

/// String-valued key-value storage.
/// Implementations can be file-backed, in-memory, or remote.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Returns whether the key existed.
    async fn remove(&self, key: &str) -> Result<bool, StorageError>;
}

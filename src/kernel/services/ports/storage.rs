use std::future::Future;
use std::pin::Pin;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::kernel::error::StorageError;

pub type StorageResult<T> = Result<T, StorageError>;

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = StorageResult<T>> + Send + 'a>>;

/// Async key/value store the workbench persists through.
///
/// The core never assumes a backing medium; values are JSON documents.
pub trait StorageAdapter: Send + Sync {
    fn get(&self, key: &str) -> StorageFuture<'_, Option<Value>>;
    fn set(&self, key: &str, value: Value) -> StorageFuture<'_, ()>;
    fn remove(&self, key: &str) -> StorageFuture<'_, ()>;
    fn list(&self) -> StorageFuture<'_, Vec<String>>;
}

pub async fn get_json<T: DeserializeOwned>(
    storage: &dyn StorageAdapter,
    key: &str,
) -> StorageResult<Option<T>> {
    let Some(value) = storage.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })
}

pub async fn set_json<T: Serialize>(
    storage: &dyn StorageAdapter,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let value = serde_json::to_value(value).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;
    storage.set(key, value).await
}

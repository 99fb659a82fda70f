use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use crate::kernel::error::StorageError;
use crate::kernel::services::ports::{StorageAdapter, StorageFuture, StorageResult};

/// In-process storage. Counts writes and can be told to reject them, which
/// makes it the storage of choice for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, Value>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Synchronous read for inspection.
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.with_entries(|entries| entries.get(key).cloned()).ok().flatten()
    }

    fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, Value>) -> T,
    ) -> StorageResult<T> {
        match self.entries.lock() {
            Ok(mut entries) => Ok(f(&mut entries)),
            Err(_) => Err(StorageError::Rejected {
                key: String::new(),
                reason: "memory storage lock poisoned".to_string(),
            }),
        }
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, key: &str) -> StorageFuture<'_, Option<Value>> {
        let result = self.with_entries(|entries| entries.get(key).cloned());
        Box::pin(async move { result })
    }

    fn set(&self, key: &str, value: Value) -> StorageFuture<'_, ()> {
        let result = if self.fail_writes.load(Ordering::SeqCst) {
            Err(StorageError::Rejected {
                key: key.to_string(),
                reason: "writes disabled".to_string(),
            })
        } else {
            self.with_entries(|entries| {
                entries.insert(key.to_string(), value);
            })
            .map(|()| {
                self.writes.fetch_add(1, Ordering::SeqCst);
            })
        };
        Box::pin(async move { result })
    }

    fn remove(&self, key: &str) -> StorageFuture<'_, ()> {
        let result = self.with_entries(|entries| {
            entries.remove(key);
        });
        Box::pin(async move { result })
    }

    fn list(&self) -> StorageFuture<'_, Vec<String>> {
        let result = self.with_entries(|entries| entries.keys().cloned().collect());
        Box::pin(async move { result })
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/memory.rs"]
mod tests;

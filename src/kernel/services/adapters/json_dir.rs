//! One JSON file per key under a directory.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::kernel::error::StorageError;
use crate::kernel::services::ports::{StorageAdapter, StorageFuture, StorageResult};

const EXTENSION: &str = "json";

/// Suffix source for temp files, so concurrent writes of one key never share one.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct JsonDirStorage {
    root: PathBuf,
}

impl JsonDirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.{EXTENSION}", encode_key(key))))
    }
}

/// Percent-encodes every byte outside `[A-Za-z0-9_-]` so any key is a safe file name.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn io_error(key: &str) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl StorageAdapter for JsonDirStorage {
    fn get(&self, key: &str) -> StorageFuture<'_, Option<Value>> {
        let key = key.to_string();
        Box::pin(async move {
            let path = self.path_for(&key)?;
            let data = match tokio::fs::read(&path).await {
                Ok(data) => data,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(err) => return Err(io_error(&key)(err)),
            };
            serde_json::from_slice(&data)
                .map(Some)
                .map_err(|source| StorageError::Json { key, source })
        })
    }

    fn set(&self, key: &str, value: Value) -> StorageFuture<'_, ()> {
        let key = key.to_string();
        Box::pin(async move {
            let path = self.path_for(&key)?;
            let body = serde_json::to_vec_pretty(&value).map_err(|source| StorageError::Json {
                key: key.clone(),
                source,
            })?;
            tokio::fs::create_dir_all(&self.root)
                .await
                .map_err(io_error(&key))?;
            // Write-then-rename so a crash never leaves a torn file behind.
            let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
            let tmp = path.with_extension(format!("{EXTENSION}.{seq}.tmp"));
            tokio::fs::write(&tmp, body).await.map_err(io_error(&key))?;
            tokio::fs::rename(&tmp, &path)
                .await
                .map_err(io_error(&key))
        })
    }

    fn remove(&self, key: &str) -> StorageFuture<'_, ()> {
        let key = key.to_string();
        Box::pin(async move {
            let path = self.path_for(&key)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(io_error(&key)(err)),
            }
        })
    }

    fn list(&self) -> StorageFuture<'_, Vec<String>> {
        Box::pin(async move {
            let mut entries = match tokio::fs::read_dir(&self.root).await {
                Ok(entries) => entries,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(err) => return Err(io_error("")(err)),
            };
            let mut keys = Vec::new();
            while let Some(entry) = entries.next_entry().await.map_err(io_error(""))? {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                match decode_key(stem) {
                    Some(key) => keys.push(key),
                    None => tracing::debug!(file = %path.display(), "skipping foreign file"),
                }
            }
            keys.sort();
            Ok(keys)
        })
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/json_dir.rs"]
mod tests;

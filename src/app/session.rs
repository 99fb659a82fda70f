use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::kernel::services::ports::StorageAdapter;
use crate::kernel::{SessionSnapshot, StorageError, WorkbenchError};

pub const SESSION_KEY: &str = "workbench:session";

/// Debounced writer and reader of the session snapshot.
pub struct SessionPersistence {
    storage: Arc<dyn StorageAdapter>,
    timer: Option<JoinHandle<()>>,
}

impl SessionPersistence {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            storage,
            timer: None,
        }
    }

    /// Replaces any scheduled write with one of `snapshot` after `delay`.
    pub fn schedule(&mut self, snapshot: Value, delay: Duration) {
        self.cancel();
        let storage = Arc::clone(&self.storage);
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match storage.set(SESSION_KEY, snapshot).await {
                Ok(()) => tracing::debug!("session saved"),
                Err(err) => tracing::warn!(error = %err, "session save failed"),
            }
        }));
    }

    pub fn is_scheduled(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Writes `snapshot` now, superseding a scheduled write.
    pub async fn save_now(&mut self, snapshot: &SessionSnapshot) -> Result<(), WorkbenchError> {
        self.cancel();
        let value = snapshot.to_value()?;
        self.storage.set(SESSION_KEY, value).await?;
        tracing::debug!("session saved");
        Ok(())
    }

    /// Fire-and-forget write used when the host is going away. Not tied to
    /// this value's lifetime, so it survives the workbench being dropped.
    pub fn save_detached(&mut self, snapshot: Value) -> JoinHandle<()> {
        self.cancel();
        let storage = Arc::clone(&self.storage);
        tokio::spawn(async move {
            if let Err(err) = storage.set(SESSION_KEY, snapshot).await {
                tracing::warn!(error = %err, "session save on unload failed");
            }
        })
    }

    /// Strict read: a stored value that does not match the schema is an error.
    pub async fn load(&self) -> Result<Option<SessionSnapshot>, WorkbenchError> {
        match self.load_raw().await? {
            Some(value) => SessionSnapshot::from_value(value).map(Some),
            None => Ok(None),
        }
    }

    pub async fn load_raw(&self) -> Result<Option<Value>, StorageError> {
        self.storage.get(SESSION_KEY).await
    }
}

impl Drop for SessionPersistence {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/session.rs"]
mod tests;

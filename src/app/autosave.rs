//! Per-tab trailing-debounce auto-save on tokio timers.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::task::JoinHandle;

use crate::kernel::clock::Clock;
use crate::kernel::services::ports::{get_json, set_json, StorageAdapter, StorageResult, WorkbenchSettings};
use crate::kernel::{StateError, StorageError, Tab, TabId};

pub const AUTO_SAVE_PREFIX: &str = "autosave:";

pub fn auto_save_key(tab: TabId) -> String {
    format!("{AUTO_SAVE_PREFIX}{}", tab.raw())
}

/// What lands in storage for one auto-saved tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSaveEntry {
    pub tab_id: TabId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    pub content: String,
    /// The tab's `modified_at` when the content was captured.
    pub modified_at: u64,
    pub saved_at: u64,
}

impl AutoSaveEntry {
    pub fn capture(tab: &Tab, saved_at: u64) -> Self {
        Self {
            tab_id: tab.id,
            title: tab.title.clone(),
            file_path: tab.file_path.clone(),
            content: tab.content.clone(),
            modified_at: tab.modified_at,
            saved_at,
        }
    }
}

/// Result of a debounced save, delivered to the single writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoSaveEvent {
    Saved { tab: TabId, modified_at: u64 },
    Failed { tab: TabId, error: StateError },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveAllReport {
    pub saved: Vec<TabId>,
    pub failed: Vec<TabId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredContent {
    pub content: String,
    pub saved_at: u64,
}

/// Per-tab write locks. A tab is "saving" while its lock is held.
#[derive(Debug, Clone, Default)]
struct PendingSaves(Arc<Mutex<FxHashMap<TabId, Arc<AsyncMutex<()>>>>>);

impl PendingSaves {
    fn lock_for(&self, tab: TabId) -> Arc<AsyncMutex<()>> {
        match self.0.lock() {
            Ok(mut locks) => Arc::clone(locks.entry(tab).or_default()),
            Err(_) => Arc::default(),
        }
    }

    /// Claims `tab`; `None` when a write for it is already running.
    fn try_begin(&self, tab: TabId) -> Option<OwnedMutexGuard<()>> {
        self.lock_for(tab).try_lock_owned().ok()
    }

    /// Waits for any write in flight for `tab`, then claims it.
    async fn begin(&self, tab: TabId) -> OwnedMutexGuard<()> {
        self.lock_for(tab).lock_owned().await
    }

    fn contains(&self, tab: TabId) -> bool {
        let Ok(locks) = self.0.lock() else {
            return false;
        };
        locks.get(&tab).is_some_and(|lock| lock.try_lock().is_err())
    }

    fn forget(&self, tab: TabId) {
        if let Ok(mut locks) = self.0.lock() {
            if locks.get(&tab).is_some_and(|lock| lock.try_lock().is_ok()) {
                locks.remove(&tab);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerPhase {
    Waiting,
    Cancelled,
    Writing,
}

/// A debounce timer. Once it starts writing it can no longer be cancelled,
/// so a write is never cut off halfway.
struct Timer {
    handle: JoinHandle<()>,
    phase: Arc<Mutex<TimerPhase>>,
}

impl Timer {
    /// Stops the timer unless its write already started. Returns whether it
    /// was still waiting.
    fn cancel(self) -> bool {
        let stopped = match self.phase.lock() {
            Ok(mut phase) if *phase == TimerPhase::Waiting => {
                *phase = TimerPhase::Cancelled;
                true
            }
            _ => false,
        };
        if stopped {
            self.handle.abort();
        }
        stopped
    }

    fn is_waiting(&self) -> bool {
        !self.handle.is_finished()
            && self
                .phase
                .lock()
                .is_ok_and(|phase| *phase == TimerPhase::Waiting)
    }
}

/// Moves a fired timer into its write phase; `false` when it was cancelled.
fn start_writing(phase: &Mutex<TimerPhase>) -> bool {
    match phase.lock() {
        Ok(mut phase) if *phase == TimerPhase::Waiting => {
            *phase = TimerPhase::Writing;
            true
        }
        _ => false,
    }
}

pub struct AutoSaveScheduler {
    storage: Arc<dyn StorageAdapter>,
    timers: FxHashMap<TabId, Timer>,
    pending: PendingSaves,
    events: UnboundedSender<AutoSaveEvent>,
    clock: Clock,
}

impl AutoSaveScheduler {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        clock: Clock,
    ) -> (Self, UnboundedReceiver<AutoSaveEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            storage,
            timers: FxHashMap::default(),
            pending: PendingSaves::default(),
            events,
            clock,
        };
        (scheduler, rx)
    }

    /// Restarts `tab`'s debounce timer with the content it holds now. Must be
    /// called from within a tokio runtime.
    pub fn trigger_auto_save(&mut self, tab: &Tab, settings: &WorkbenchSettings) {
        self.cancel(tab.id);
        if !settings.auto_save {
            return;
        }

        let delay = Duration::from_millis(settings.effective_auto_save_delay_ms());
        let storage = Arc::clone(&self.storage);
        let pending = self.pending.clone();
        let events = self.events.clone();
        let clock = self.clock;
        let snapshot = tab.clone();
        let id = tab.id;

        let phase = Arc::new(Mutex::new(TimerPhase::Waiting));
        let task_phase = Arc::clone(&phase);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(guard) = pending.try_begin(id) else {
                tracing::debug!(tab = %id, "auto-save skipped; write already in flight");
                return;
            };
            if !start_writing(&task_phase) {
                return;
            }
            let entry = AutoSaveEntry::capture(&snapshot, clock());
            let result = write_entry(&*storage, &entry).await;
            drop(guard);
            let event = match result {
                Ok(()) => {
                    tracing::debug!(tab = %id, "auto-saved");
                    AutoSaveEvent::Saved {
                        tab: id,
                        modified_at: entry.modified_at,
                    }
                }
                Err(err) => {
                    tracing::warn!(tab = %id, error = %err, "auto-save failed");
                    AutoSaveEvent::Failed {
                        tab: id,
                        error: StateError::save_failure(err.to_string()),
                    }
                }
            };
            let _ = events.send(event);
        });
        self.timers.insert(id, Timer { handle, phase });
    }

    /// Cancels the timer and writes `tab` right away, after any write for
    /// it that is already in flight.
    pub async fn save_immediately(&mut self, tab: &Tab) -> StorageResult<()> {
        self.cancel(tab.id);
        let _guard = self.pending.begin(tab.id).await;
        let entry = AutoSaveEntry::capture(tab, (self.clock)());
        write_entry(&*self.storage, &entry).await
    }

    /// Saves every dirty tab in order. One failure does not stop the rest.
    pub async fn save_all(&mut self, tabs: &[Tab]) -> SaveAllReport {
        let mut report = SaveAllReport::default();
        for tab in tabs.iter().filter(|t| t.is_dirty) {
            match self.save_immediately(tab).await {
                Ok(()) => report.saved.push(tab.id),
                Err(err) => {
                    tracing::warn!(tab = %tab.id, error = %err, "save failed");
                    report.failed.push(tab.id);
                }
            }
        }
        report
    }

    /// Last auto-saved content for `tab`, if any. Live state is untouched.
    pub async fn recover_auto_saved_content(&self, tab: TabId) -> Option<RecoveredContent> {
        match get_json::<AutoSaveEntry>(&*self.storage, &auto_save_key(tab)).await {
            Ok(entry) => entry.map(|e| RecoveredContent {
                content: e.content,
                saved_at: e.saved_at,
            }),
            Err(err) => {
                tracing::warn!(tab = %tab, error = %err, "auto-save entry unreadable");
                None
            }
        }
    }

    /// Cancels a waiting timer. A write that already started runs to the end.
    pub fn cancel(&mut self, tab: TabId) -> bool {
        self.timers.remove(&tab).is_some_and(Timer::cancel)
    }

    pub fn cancel_all(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.cancel();
        }
    }

    /// Cancels the timer and deletes the stored entry.
    pub async fn discard(&mut self, tab: TabId) -> StorageResult<()> {
        self.cancel(tab);
        let result = {
            let _guard = self.pending.begin(tab).await;
            self.storage.remove(&auto_save_key(tab)).await
        };
        self.pending.forget(tab);
        result
    }

    /// Timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.timers.values().filter(|t| t.is_waiting()).count()
    }

    pub fn is_saving(&self, tab: TabId) -> bool {
        self.pending.contains(tab)
    }
}

impl Drop for AutoSaveScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

async fn write_entry(storage: &dyn StorageAdapter, entry: &AutoSaveEntry) -> StorageResult<()> {
    set_json(storage, &auto_save_key(entry.tab_id), entry).await
}

/// Removes auto-save entries older than `max_age_ms`. Unreadable entries go too.
pub async fn sweep_expired(
    storage: &dyn StorageAdapter,
    max_age_ms: u64,
    now: u64,
) -> StorageResult<usize> {
    let mut removed = 0;
    for key in storage.list().await? {
        if !key.starts_with(AUTO_SAVE_PREFIX) {
            continue;
        }
        let expired = match get_json::<AutoSaveEntry>(storage, &key).await {
            Ok(Some(entry)) => now.saturating_sub(entry.saved_at) > max_age_ms,
            Ok(None) => false,
            Err(StorageError::Json { .. }) => true,
            Err(err) => return Err(err),
        };
        if expired {
            storage.remove(&key).await?;
            removed += 1;
        }
    }
    if removed > 0 {
        tracing::info!(removed, "expired auto-save entries swept");
    }
    Ok(removed)
}

#[cfg(test)]
#[path = "../../tests/unit/app/autosave.rs"]
mod tests;

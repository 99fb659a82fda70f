use super::*;
use crate::kernel::services::adapters::MemoryStorage;
use crate::kernel::services::ports::StorageFuture;
use crate::kernel::{StateErrorKind, TabOptions};
use serde_json::{json, Value};

fn clock() -> u64 {
    5_000
}

fn dirty_tab(raw: u64, content: &str) -> Tab {
    let mut tab = Tab::new(TabId::new(raw), TabOptions::titled("a").with_content(content), 0);
    tab.is_dirty = true;
    tab.modified_at = 10;
    tab
}

fn stored_content(storage: &MemoryStorage, tab: TabId) -> Option<String> {
    storage
        .peek(&auto_save_key(tab))
        .and_then(|v| v["content"].as_str().map(str::to_string))
}

/// Memory storage whose writes take `delay` to land.
struct SlowStorage {
    inner: MemoryStorage,
    delay: Duration,
}

impl SlowStorage {
    fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStorage::new(),
            delay,
        }
    }
}

impl StorageAdapter for SlowStorage {
    fn get(&self, key: &str) -> StorageFuture<'_, Option<Value>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: Value) -> StorageFuture<'_, ()> {
        let key = key.to_string();
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            self.inner.set(&key, value).await
        })
    }

    fn remove(&self, key: &str) -> StorageFuture<'_, ()> {
        self.inner.remove(key)
    }

    fn list(&self) -> StorageFuture<'_, Vec<String>> {
        self.inner.list()
    }
}

#[tokio::test(start_paused = true)]
async fn repeated_triggers_collapse_into_one_write() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut scheduler, mut rx) = AutoSaveScheduler::new(storage.clone(), clock);
    let settings = WorkbenchSettings::default();

    scheduler.trigger_auto_save(&dirty_tab(1, "first"), &settings);
    tokio::time::advance(Duration::from_millis(1_000)).await;
    scheduler.trigger_auto_save(&dirty_tab(1, "second"), &settings);

    let event = rx.recv().await.unwrap();
    assert_eq!(
        event,
        AutoSaveEvent::Saved {
            tab: TabId::new(1),
            modified_at: 10,
        }
    );
    assert_eq!(storage.write_count(), 1);
    assert_eq!(stored_content(&storage, TabId::new(1)).as_deref(), Some("second"));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(storage.write_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn delay_never_drops_below_the_minimum() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut scheduler, _rx) = AutoSaveScheduler::new(storage.clone(), clock);
    let settings = WorkbenchSettings {
        auto_save_delay_ms: 10,
        ..WorkbenchSettings::default()
    };

    scheduler.trigger_auto_save(&dirty_tab(1, "x"), &settings);
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(storage.write_count(), 0);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(storage.write_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn disabled_auto_save_arms_nothing() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut scheduler, _rx) = AutoSaveScheduler::new(storage.clone(), clock);
    let settings = WorkbenchSettings {
        auto_save: false,
        ..WorkbenchSettings::default()
    };

    scheduler.trigger_auto_save(&dirty_tab(1, "x"), &settings);
    assert_eq!(scheduler.pending_timers(), 0);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(storage.write_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancelled_timers_never_write() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut scheduler, _rx) = AutoSaveScheduler::new(storage.clone(), clock);
    let settings = WorkbenchSettings::default();

    scheduler.trigger_auto_save(&dirty_tab(1, "x"), &settings);
    scheduler.trigger_auto_save(&dirty_tab(2, "y"), &settings);
    assert_eq!(scheduler.pending_timers(), 2);
    assert!(scheduler.cancel(TabId::new(1)));
    assert!(!scheduler.cancel(TabId::new(1)));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(storage.write_count(), 1);
    assert!(storage.peek(&auto_save_key(TabId::new(1))).is_none());

    scheduler.trigger_auto_save(&dirty_tab(3, "z"), &settings);
    scheduler.cancel_all();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(storage.write_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_writes_are_reported() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set_fail_writes(true);
    let (mut scheduler, mut rx) = AutoSaveScheduler::new(storage.clone(), clock);

    scheduler.trigger_auto_save(&dirty_tab(4, "x"), &WorkbenchSettings::default());

    match rx.recv().await.unwrap() {
        AutoSaveEvent::Failed { tab, error } => {
            assert_eq!(tab, TabId::new(4));
            assert_eq!(error.kind, StateErrorKind::SaveFailure);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!scheduler.is_saving(TabId::new(4)));
}

#[tokio::test(start_paused = true)]
async fn timer_firing_during_a_write_is_skipped() {
    let storage = Arc::new(SlowStorage::new(Duration::from_secs(5)));
    let (mut scheduler, mut rx) = AutoSaveScheduler::new(storage.clone(), clock);
    let settings = WorkbenchSettings::default();
    let id = TabId::new(1);

    scheduler.trigger_auto_save(&dirty_tab(1, "first"), &settings);
    tokio::time::sleep(Duration::from_millis(2_100)).await;
    assert!(scheduler.is_saving(id));

    scheduler.trigger_auto_save(&dirty_tab(1, "second"), &settings);
    tokio::time::sleep(Duration::from_millis(2_100)).await;
    assert_eq!(scheduler.pending_timers(), 0);
    assert!(scheduler.is_saving(id));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(storage.inner.write_count(), 1);
    assert_eq!(stored_content(&storage.inner, id).as_deref(), Some("first"));
    assert!(!scheduler.is_saving(id));
    assert_eq!(
        rx.recv().await.unwrap(),
        AutoSaveEvent::Saved {
            tab: id,
            modified_at: 10,
        }
    );
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn save_immediately_waits_for_the_write_in_flight() {
    let storage = Arc::new(SlowStorage::new(Duration::from_secs(1)));
    let (mut scheduler, mut rx) = AutoSaveScheduler::new(storage.clone(), clock);
    let id = TabId::new(1);

    scheduler.trigger_auto_save(&dirty_tab(1, "debounced"), &WorkbenchSettings::default());
    tokio::time::sleep(Duration::from_millis(2_100)).await;
    assert!(scheduler.is_saving(id));

    let mut latest = dirty_tab(1, "latest");
    latest.modified_at = 11;
    scheduler.save_immediately(&latest).await.unwrap();

    assert_eq!(storage.inner.write_count(), 2);
    assert_eq!(stored_content(&storage.inner, id).as_deref(), Some("latest"));
    assert!(!scheduler.is_saving(id));
    assert_eq!(
        rx.recv().await.unwrap(),
        AutoSaveEvent::Saved {
            tab: id,
            modified_at: 10,
        }
    );
}

#[tokio::test]
async fn save_immediately_then_recover() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut scheduler, _rx) = AutoSaveScheduler::new(storage.clone(), clock);

    scheduler.save_immediately(&dirty_tab(1, "draft")).await.unwrap();

    let recovered = scheduler
        .recover_auto_saved_content(TabId::new(1))
        .await
        .unwrap();
    assert_eq!(
        recovered,
        RecoveredContent {
            content: "draft".into(),
            saved_at: 5_000,
        }
    );
    assert!(scheduler
        .recover_auto_saved_content(TabId::new(2))
        .await
        .is_none());

    scheduler.discard(TabId::new(1)).await.unwrap();
    assert!(scheduler
        .recover_auto_saved_content(TabId::new(1))
        .await
        .is_none());
}

#[tokio::test]
async fn save_all_skips_clean_tabs_and_reports_failures() {
    let storage = Arc::new(MemoryStorage::new());
    let (mut scheduler, _rx) = AutoSaveScheduler::new(storage.clone(), clock);
    let mut clean = dirty_tab(2, "clean");
    clean.is_dirty = false;

    let report = scheduler.save_all(&[dirty_tab(1, "a"), clean]).await;
    assert_eq!(report.saved, vec![TabId::new(1)]);
    assert!(report.failed.is_empty());

    storage.set_fail_writes(true);
    let report = scheduler.save_all(&[dirty_tab(3, "b")]).await;
    assert!(report.saved.is_empty());
    assert_eq!(report.failed, vec![TabId::new(3)]);
}

#[tokio::test]
async fn sweep_removes_stale_and_unreadable_entries() {
    let storage = MemoryStorage::new();
    let fresh = AutoSaveEntry::capture(&dirty_tab(1, "new"), 9_000);
    let stale = AutoSaveEntry::capture(&dirty_tab(2, "old"), 1_000);
    set_json(&storage, &auto_save_key(TabId::new(1)), &fresh).await.unwrap();
    set_json(&storage, &auto_save_key(TabId::new(2)), &stale).await.unwrap();
    storage.set("autosave:junk", json!("garbage")).await.unwrap();
    storage.set("workbench:session", json!({})).await.unwrap();

    let removed = sweep_expired(&storage, 5_000, 10_000).await.unwrap();

    assert_eq!(removed, 2);
    assert_eq!(
        storage.list().await.unwrap(),
        vec![auto_save_key(TabId::new(1)), "workbench:session".to_string()]
    );
}

use super::*;
use crate::kernel::services::adapters::MemoryStorage;
use crate::kernel::services::ports::{LayoutConfig, WorkbenchSettings};
use crate::kernel::WorkbenchState;
use serde_json::json;

fn snapshot() -> SessionSnapshot {
    WorkbenchState::with_default_layout(LayoutConfig::default(), WorkbenchSettings::default())
        .snapshot(1)
}

#[tokio::test(start_paused = true)]
async fn scheduled_writes_are_debounced() {
    let storage = Arc::new(MemoryStorage::new());
    let mut session = SessionPersistence::new(storage.clone());

    session.schedule(json!({ "n": 1 }), Duration::from_secs(2));
    tokio::time::advance(Duration::from_secs(1)).await;
    session.schedule(json!({ "n": 2 }), Duration::from_secs(2));
    assert!(session.is_scheduled());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(storage.write_count(), 1);
    assert_eq!(storage.peek(SESSION_KEY), Some(json!({ "n": 2 })));
    assert!(!session.is_scheduled());
}

#[tokio::test(start_paused = true)]
async fn save_now_supersedes_the_scheduled_write() {
    let storage = Arc::new(MemoryStorage::new());
    let mut session = SessionPersistence::new(storage.clone());
    session.schedule(json!("stale"), Duration::from_secs(2));

    session.save_now(&snapshot()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(storage.write_count(), 1);
    let loaded = session.load().await.unwrap().unwrap();
    assert_eq!(loaded, snapshot());
}

#[tokio::test]
async fn detached_saves_outlive_the_writer() {
    let storage = Arc::new(MemoryStorage::new());
    let mut session = SessionPersistence::new(storage.clone());

    let handle = session.save_detached(json!({ "bye": true }));
    drop(session);
    handle.await.unwrap();

    assert_eq!(storage.peek(SESSION_KEY), Some(json!({ "bye": true })));
}

#[tokio::test]
async fn load_is_strict_but_load_raw_is_not() {
    let storage = Arc::new(MemoryStorage::new());
    let session = SessionPersistence::new(storage.clone());
    assert!(session.load().await.unwrap().is_none());
    assert!(session.load_raw().await.unwrap().is_none());

    storage.set(SESSION_KEY, json!({ "tabs": 3 })).await.unwrap();

    assert!(matches!(
        session.load().await,
        Err(WorkbenchError::Corruption(_))
    ));
    assert_eq!(session.load_raw().await.unwrap(), Some(json!({ "tabs": 3 })));
}

#[tokio::test]
async fn storage_failures_surface_from_save_now() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set_fail_writes(true);
    let mut session = SessionPersistence::new(storage.clone());

    let err = session.save_now(&snapshot()).await.unwrap_err();
    assert!(matches!(err, WorkbenchError::Storage(StorageError::Rejected { .. })));
}

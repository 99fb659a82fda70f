use super::*;
use serde_json::json;

#[tokio::test]
async fn set_get_remove_list() {
    let storage = MemoryStorage::new();
    storage.set("b", json!(2)).await.unwrap();
    storage.set("a", json!({ "x": 1 })).await.unwrap();

    assert_eq!(storage.get("a").await.unwrap(), Some(json!({ "x": 1 })));
    assert_eq!(storage.list().await.unwrap(), vec!["a", "b"]);
    assert_eq!(storage.write_count(), 2);

    storage.remove("a").await.unwrap();
    storage.remove("a").await.unwrap();
    assert_eq!(storage.get("a").await.unwrap(), None);
    assert_eq!(storage.peek("b"), Some(json!(2)));
}

#[tokio::test]
async fn failing_writes_are_rejected_and_not_counted() {
    let storage = MemoryStorage::new();
    storage.set_fail_writes(true);

    let err = storage.set("k", json!(1)).await.unwrap_err();
    assert!(matches!(err, StorageError::Rejected { .. }));
    assert_eq!(storage.write_count(), 0);
    assert_eq!(storage.peek("k"), None);

    storage.set_fail_writes(false);
    storage.set("k", json!(1)).await.unwrap();
    assert_eq!(storage.write_count(), 1);
}

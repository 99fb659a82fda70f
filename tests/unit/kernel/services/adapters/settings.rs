use super::*;
use crate::kernel::services::ports::StackingStrategy;

#[test]
fn ensure_writes_defaults_once() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("cfg").join("settings.json");

    ensure_settings_file(&path).unwrap();
    assert_eq!(load_settings(&path), WorkbenchSettings::default());

    std::fs::write(&path, r#"{ "autoSave": false }"#).unwrap();
    ensure_settings_file(&path).unwrap();
    assert!(!load_settings(&path).auto_save);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "maxVisibleTabs": 4, "stackingStrategy": "manual" }"#,
    )
    .unwrap();

    let settings = load_settings(&path);
    assert_eq!(settings.max_visible_tabs, 4);
    assert_eq!(settings.stacking_strategy, StackingStrategy::Manual);
    assert_eq!(settings.auto_save_delay_ms, 2000);
}

#[test]
fn missing_or_malformed_files_fall_back_to_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    assert_eq!(
        load_settings(&tmp.path().join("absent.json")),
        WorkbenchSettings::default()
    );

    let broken = tmp.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert_eq!(load_settings(&broken), WorkbenchSettings::default());
}

use super::*;
use crate::kernel::layout::SplitDirection;
use crate::kernel::tabs::TabOptions;

fn populated() -> WorkbenchState {
    let mut state =
        WorkbenchState::with_default_layout(LayoutConfig::default(), WorkbenchSettings::default());
    let p1 = state.layout().active_pane().unwrap();
    let a = state.create_tab(TabOptions::for_file("/src/a.rs", "fn a() {}"), Some(p1), 1);
    let b = state.create_tab(TabOptions::for_file("/src/a.css", ""), Some(p1), 2);
    let p2 = state.split_pane(p1, SplitDirection::Vertical).unwrap();
    let c = state.create_tab(TabOptions::titled("scratch"), Some(p2), 3);
    state.create_group("g".into(), "#123456".into(), vec![a, c]);
    state.create_stack(p1, vec![b]);
    state.link_tabs(a, b);
    state.save_workspace_layout("two panes".into(), String::new(), 4);
    state
}

#[test]
fn snapshot_survives_a_json_round_trip() {
    let state = populated();
    let value = state.snapshot(99).to_value().unwrap();
    let decoded = SessionSnapshot::from_value(value).unwrap();
    let restored = WorkbenchState::from_snapshot(decoded, LayoutConfig::default()).unwrap();

    assert_eq!(restored.layout(), state.layout());
    assert_eq!(restored.tabs(), state.tabs());
    assert_eq!(restored.groups().count(), 1);
    assert_eq!(restored.stacks().count(), 1);
    assert_eq!(restored.workspace_layouts().count(), 1);
    assert_eq!(restored.settings(), state.settings());
}

#[test]
fn json_uses_camel_case_and_layout_type() {
    let value = populated().snapshot(7).to_value().unwrap();

    assert_eq!(value["version"], SNAPSHOT_VERSION);
    assert_eq!(value["savedAt"], 7);
    assert_eq!(value["layout"]["type"], "split");
    assert!(value["tabGroups"].is_array());
    assert!(value["activePane"].is_u64());
    assert!(value["tabs"][0]["isDirty"].is_boolean());
}

#[test]
fn restored_state_allocates_fresh_ids() {
    let state = populated();
    let max_tab = state.tabs().ids().max().unwrap();
    let mut restored =
        WorkbenchState::from_snapshot(state.snapshot(0), LayoutConfig::default()).unwrap();

    let fresh = restored.create_tab(TabOptions::default(), None, 10);
    assert!(fresh > max_tab);
}

#[test]
fn strict_decode_rejects_schema_mismatch() {
    let err = SessionSnapshot::from_value(serde_json::json!({ "tabs": "nope" })).unwrap_err();
    assert!(matches!(err, WorkbenchError::Corruption(_)));
}

#[test]
fn dangling_references_fail_strict_restore() {
    let mut snapshot = populated().snapshot(0);
    snapshot.tabs.clear();

    let err = WorkbenchState::from_snapshot(snapshot, LayoutConfig::default()).unwrap_err();
    assert!(matches!(err, WorkbenchError::Corruption(_)));
}

use super::*;
use crate::kernel::services::ports::{LayoutConfig, WorkbenchSettings};
use crate::kernel::tabs::TabOptions;

fn with_tabs(n: usize) -> (WorkbenchState, Vec<TabId>) {
    let mut state =
        WorkbenchState::with_default_layout(LayoutConfig::default(), WorkbenchSettings::default());
    let tabs = (0..n)
        .map(|i| state.create_tab(TabOptions::titled(format!("t{i}")), None, i as u64))
        .collect();
    (state, tabs)
}

#[test]
fn membership_is_exclusive_and_color_follows_group() {
    let (mut state, tabs) = with_tabs(2);
    let red = state.create_group("red".into(), "#f00".into(), vec![tabs[0], tabs[1]]);
    let blue = state.create_group("blue".into(), "#00f".into(), Vec::new());

    assert!(state.add_tab_to_group(tabs[0], blue));

    assert_eq!(state.group(red).unwrap().tabs, vec![tabs[1]]);
    assert_eq!(state.group(blue).unwrap().tabs, vec![tabs[0]]);
    let moved = state.tab(tabs[0]).unwrap();
    assert_eq!(moved.group_id, Some(blue));
    assert_eq!(moved.color.as_deref(), Some("#00f"));
    assert!(state.check_invariants().is_empty());
}

#[test]
fn recolor_updates_members() {
    let (mut state, tabs) = with_tabs(1);
    let group = state.create_group("g".into(), "#111".into(), vec![tabs[0]]);

    assert!(state.update_group(group, None, Some("#222".into())));
    assert_eq!(state.tab(tabs[0]).unwrap().color.as_deref(), Some("#222"));
    assert!(!state.update_group(group, None, Some("#222".into())));
}

#[test]
fn delete_group_keeps_tabs_open() {
    let (mut state, tabs) = with_tabs(2);
    let group = state.create_group("g".into(), "#abc".into(), tabs.clone());

    assert!(state.delete_group(group));

    assert!(state.group(group).is_none());
    for tab in &tabs {
        let t = state.tab(*tab).expect("tab still open");
        assert_eq!(t.group_id, None);
        assert_eq!(t.color, None);
    }
}

#[test]
fn locked_group_refuses_changes() {
    let (mut state, tabs) = with_tabs(2);
    let group = state.create_group("g".into(), "#abc".into(), vec![tabs[0]]);
    assert!(state.lock_group(group, true));

    assert!(!state.add_tab_to_group(tabs[1], group));
    assert!(!state.remove_tab_from_group(tabs[0]));
    assert!(!state.delete_group(group));
    assert_eq!(state.group(group).unwrap().tabs, vec![tabs[0]]);
}

#[test]
fn unknown_ids_are_no_ops() {
    let (mut state, tabs) = with_tabs(1);
    let group = state.create_group("g".into(), "#abc".into(), Vec::new());
    assert!(!state.add_tab_to_group(TabId::new(999), group));
    assert!(!state.add_tab_to_group(tabs[0], GroupId::new(999)));
    assert!(!state.toggle_group_collapsed(GroupId::new(999)));
}

#[test]
fn collapse_toggles() {
    let (mut state, _) = with_tabs(0);
    let group = state.create_group("g".into(), "#abc".into(), Vec::new());
    assert!(state.toggle_group_collapsed(group));
    assert!(state.group(group).unwrap().is_collapsed);
    assert!(state.toggle_group_collapsed(group));
    assert!(!state.group(group).unwrap().is_collapsed);
}

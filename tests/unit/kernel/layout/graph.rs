use crate::kernel::services::ports::{LayoutConfig, WorkbenchSettings};
use crate::kernel::tabs::TabOptions;
use crate::kernel::{Effect, LayoutKind, PaneId, PaneSize, SplitDirection, TabId, WorkbenchState};

fn single_pane() -> (WorkbenchState, PaneId) {
    let state =
        WorkbenchState::with_default_layout(LayoutConfig::default(), WorkbenchSettings::default());
    let pane = state.layout().active_pane().unwrap();
    (state, pane)
}

fn add_tab(state: &mut WorkbenchState, pane: PaneId, title: &str) -> TabId {
    state.create_tab(TabOptions::titled(title), Some(pane), 0)
}

#[test]
fn split_halves_the_source_and_activates_the_new_pane() {
    let (mut state, p1) = single_pane();
    let p2 = state.split_pane(p1, SplitDirection::Vertical).unwrap();

    assert_eq!(state.layout().kind(), LayoutKind::Split);
    assert_eq!(state.layout().active_pane(), Some(p2));
    assert_eq!(state.layout().pane(p1).unwrap().size.width, 400.0);
    assert_eq!(state.layout().pane(p2).unwrap().size.width, 400.0);
    assert_eq!(state.layout().pane(p2).unwrap().size.height, 600.0);

    let splitter = state.layout().splitters().next().unwrap();
    assert_eq!((splitter.pane_a, splitter.pane_b), (p1, p2));
    assert_eq!(splitter.position, 0.5);
    assert!(state.check_invariants().is_empty());
}

#[test]
fn split_unknown_pane_is_ignored() {
    let (mut state, _) = single_pane();
    assert_eq!(
        state.split_pane(PaneId::new(999), SplitDirection::Horizontal),
        None
    );
    assert_eq!(state.layout().pane_count(), 1);
}

#[test]
fn close_pane_hands_tabs_to_the_neighbor() {
    let (mut state, p1) = single_pane();
    let a = add_tab(&mut state, p1, "a");
    let p2 = state.split_pane(p1, SplitDirection::Vertical).unwrap();
    let b = add_tab(&mut state, p2, "b");

    let (changed, effects) = state.close_pane(p1);

    assert!(changed);
    assert!(effects.is_empty());
    assert_eq!(state.layout().pane_count(), 1);
    assert_eq!(state.layout().kind(), LayoutKind::Single);
    assert_eq!(state.layout().active_pane(), Some(p2));
    assert_eq!(state.layout().pane(p2).unwrap().tabs, vec![b, a]);
    assert!(state.check_invariants().is_empty());
}

#[test]
fn last_pane_is_never_closed() {
    let (mut state, p1) = single_pane();
    let (changed, _) = state.close_pane(p1);
    assert!(!changed);
    assert_eq!(state.layout().pane_count(), 1);
}

#[test]
fn closing_an_isolated_pane_closes_its_tabs() {
    let (mut state, p1) = single_pane();
    let p2 = state.create_pane(None);
    let tab = state.create_tab(TabOptions::for_file("/x/a.rs", ""), Some(p2), 0);

    let (changed, effects) = state.close_pane(p2);

    assert!(changed);
    assert_eq!(effects, vec![Effect::CancelAutoSave { tab }]);
    assert!(state.tab(tab).is_none());
    assert_eq!(state.recent_files().len(), 1);
    assert_eq!(state.layout().active_pane(), Some(p1));
}

#[test]
fn merge_requires_a_connecting_splitter() {
    let (mut state, p1) = single_pane();
    let loose = state.create_pane(None);
    assert!(!state.can_merge_panes(p1, loose));
    assert!(!state.merge_panes(p1, loose));
    assert!(!state.can_merge_panes(p1, p1));
}

#[test]
fn merge_grows_target_and_drops_splitters() {
    let (mut state, p1) = single_pane();
    let p2 = state.split_pane(p1, SplitDirection::Horizontal).unwrap();
    let tab = add_tab(&mut state, p2, "moved");

    assert!(state.merge_panes(p1, p2));

    assert!(state.layout().pane(p2).is_none());
    assert_eq!(state.layout().splitters().count(), 0);
    assert_eq!(state.layout().kind(), LayoutKind::Single);
    assert_eq!(state.layout().active_pane(), Some(p1));
    let target = state.layout().pane(p1).unwrap();
    assert_eq!(target.size.height, 600.0);
    assert_eq!(target.tabs, vec![tab]);
    assert_eq!(target.active_tab, Some(tab));
}

#[test]
fn merge_keeps_the_source_stack_with_its_tabs() {
    let (mut state, p1) = single_pane();
    let p2 = state.split_pane(p1, SplitDirection::Vertical).unwrap();
    let a = add_tab(&mut state, p2, "a");
    let b = add_tab(&mut state, p2, "b");
    let stack = state.create_stack(p2, vec![a, b]).unwrap();

    assert!(state.merge_panes(p1, p2));

    let stack = state.stack(stack).expect("stack survives");
    assert_eq!(stack.pane_id, p1);
    assert_eq!(stack.tabs, vec![a, b]);
    assert!(state.check_invariants().is_empty());
}

#[test]
fn resize_split_below_minimum_merges() {
    let (mut state, p1) = single_pane();
    let p2 = state.split_pane(p1, SplitDirection::Horizontal).unwrap();
    let splitter = state.layout().splitters().next().unwrap().id;

    assert!(state.resize_split(splitter, 0.05));

    assert!(state.layout().splitter(splitter).is_none());
    assert_eq!(state.layout().pane_count(), 1);
    assert!(state.layout().pane(p2).is_some());
    assert_eq!(state.layout().kind(), LayoutKind::Single);
}

#[test]
fn resize_split_sets_both_extents() {
    let (mut state, p1) = single_pane();
    let p2 = state.split_pane(p1, SplitDirection::Vertical).unwrap();
    let splitter = state.layout().splitters().next().unwrap().id;

    assert!(state.resize_split(splitter, 0.25));

    assert_eq!(state.layout().splitter(splitter).unwrap().position, 0.25);
    assert_eq!(state.layout().pane(p1).unwrap().size.width, 300.0);
    assert_eq!(state.layout().pane(p2).unwrap().size.width, 900.0);
}

#[test]
fn resize_pane_clamps_to_minimum() {
    let (mut state, p1) = single_pane();
    assert!(state.resize_pane(p1, 10.0, 10.0));
    assert_eq!(
        state.layout().pane(p1).unwrap().size,
        PaneSize::new(200.0, 150.0)
    );
    assert!(!state.resize_pane(p1, 200.0, 150.0));
}

#[test]
fn auto_merge_folds_undersized_panes() {
    let (mut state, p1) = single_pane();
    let p2 = state.split_pane(p1, SplitDirection::Vertical).unwrap();
    state.layout.pane_mut(p2).unwrap().size = PaneSize::new(50.0, 600.0);

    assert!(state.auto_merge_panes());
    assert_eq!(state.layout().pane_count(), 1);
    assert!(state.layout().pane(p1).is_some());
    assert!(!state.auto_merge_panes());
}

#[test]
fn split_with_tab_moves_it_into_the_new_pane() {
    let (mut state, p1) = single_pane();
    let a = add_tab(&mut state, p1, "a");
    let b = add_tab(&mut state, p1, "b");

    let p2 = state
        .split_pane_with_tab(a, SplitDirection::Vertical, 5)
        .unwrap();

    assert_eq!(state.layout().pane(p1).unwrap().tabs, vec![b]);
    assert_eq!(state.layout().pane(p2).unwrap().tabs, vec![a]);
    assert_eq!(state.active_tab().map(|t| t.id), Some(a));
    assert!(state.check_invariants().is_empty());
}

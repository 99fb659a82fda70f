use super::*;
use crate::kernel::layout::SplitDirection;
use crate::kernel::services::ports::{LayoutConfig, WorkbenchSettings};
use crate::kernel::tabs::{TabOptions, TabUpdate};

fn fixed_clock() -> u64 {
    1_000
}

fn new_store() -> Store {
    let state =
        WorkbenchState::with_default_layout(LayoutConfig::default(), WorkbenchSettings::default());
    Store::with_clock(state, fixed_clock)
}

fn open(store: &mut Store, title: &str) -> TabId {
    store
        .dispatch(Action::CreateTab {
            options: TabOptions::titled(title),
            pane: None,
        })
        .tab()
        .expect("tab created")
}

#[test]
fn create_tab_reports_the_new_id_and_stamps_time() {
    let mut store = new_store();
    let result = store.dispatch(Action::CreateTab {
        options: TabOptions::titled("a"),
        pane: None,
    });

    assert!(result.state_changed);
    assert!(result.effects.is_empty());
    let tab = result.tab().unwrap();
    assert_eq!(store.state().tab(tab).unwrap().last_activated, 1_000);
    assert_eq!(result.pane(), None);
}

#[test]
fn split_reports_the_new_pane() {
    let mut store = new_store();
    let pane = store.state().layout().active_pane().unwrap();

    let result = store.dispatch(Action::SplitPane {
        pane,
        direction: SplitDirection::Vertical,
    });

    let created = result.pane().unwrap();
    assert_eq!(store.state().layout().active_pane(), Some(created));
}

#[test]
fn unknown_targets_leave_state_unchanged() {
    let mut store = new_store();
    let before = store.state().clone();

    let result = store.dispatch(Action::CloseTab {
        tab: TabId::new(404),
    });
    assert!(!result.state_changed);
    assert!(result.outcome.is_none());

    let result = store.dispatch(Action::SplitPane {
        pane: PaneId::new(404),
        direction: SplitDirection::Horizontal,
    });
    assert!(!result.state_changed);
    assert_eq!(store.state().layout(), before.layout());
    assert_eq!(store.state().tabs(), before.tabs());
}

#[test]
fn content_updates_schedule_auto_save() {
    let mut store = new_store();
    let tab = open(&mut store, "a");

    let result = store.dispatch(Action::UpdateTab {
        tab,
        update: TabUpdate::content("hello"),
    });

    assert!(result.state_changed);
    assert_eq!(result.effects, vec![Effect::ScheduleAutoSave { tab }]);
}

#[test]
fn closing_a_tab_cancels_its_auto_save() {
    let mut store = new_store();
    let tab = open(&mut store, "a");

    let result = store.dispatch(Action::CloseTab { tab });

    assert_eq!(result.effects, vec![Effect::CancelAutoSave { tab }]);
}

#[test]
fn disabling_auto_save_cancels_pending_saves() {
    let mut store = new_store();
    let settings = WorkbenchSettings {
        auto_save: false,
        ..WorkbenchSettings::default()
    };

    let result = store.dispatch(Action::UpdateSettings(settings.clone()));
    assert!(result.state_changed);
    assert_eq!(result.effects, vec![Effect::CancelAllAutoSaves]);

    let result = store.dispatch(Action::UpdateSettings(settings));
    assert!(!result.state_changed);
    assert!(result.effects.is_empty());
}

#[test]
fn group_stack_and_layout_outcomes() {
    let mut store = new_store();
    let a = open(&mut store, "a");
    let pane = store.state().layout().active_pane().unwrap();

    let group = store
        .dispatch(Action::CreateGroup {
            name: "g".into(),
            color: "#000".into(),
            tabs: vec![a],
        })
        .group();
    assert!(group.is_some());

    let stack = store
        .dispatch(Action::CreateStack {
            pane,
            tabs: vec![a],
        })
        .stack();
    assert!(stack.is_some());

    let layout = store
        .dispatch(Action::SaveWorkspaceLayout {
            name: "l".into(),
            description: String::new(),
        })
        .workspace_layout()
        .unwrap();
    assert_eq!(
        store.state().workspace_layout(layout).unwrap().created_at,
        1_000
    );
}

#[test]
fn navigate_back_reports_the_tab_it_lands_on() {
    let mut store = new_store();
    let a = open(&mut store, "a");
    open(&mut store, "b");
    let pane = store.state().layout().active_pane().unwrap();

    let result = store.dispatch(Action::NavigateBack { pane });
    assert_eq!(result.tab(), Some(a));
    assert_eq!(store.state().active_tab().map(|t| t.id), Some(a));
}

#[test]
fn mark_saved_clears_dirty() {
    let mut store = new_store();
    let tab = open(&mut store, "a");
    store.dispatch(Action::UpdateTab {
        tab,
        update: TabUpdate::content("x"),
    });
    let modified_at = store.state().tab(tab).unwrap().modified_at;

    let result = store.dispatch(Action::MarkSaved { tab, modified_at });

    assert!(result.state_changed);
    assert!(!store.state().has_dirty_tabs());
}

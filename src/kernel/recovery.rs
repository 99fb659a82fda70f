//! Tolerant session restore: salvage what parses, repair references, report the rest.

use std::path::PathBuf;

use rustc_hash::FxHashSet;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::StateError;
use super::groups::TabGroup;
use super::ids::{PaneId, TabId};
use super::layout::{LayoutKind, Pane, Splitter};
use super::services::ports::{LayoutConfig, WorkbenchSettings};
use super::stacks::TabStack;
use super::state::WorkbenchState;
use super::tabs::Tab;
use super::workspace_layouts::WorkspaceLayout;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecoveryReport {
    /// True only when the snapshot was applied without any repair.
    pub recovered: bool,
    pub errors: Vec<StateError>,
    pub warnings: Vec<String>,
}

impl RecoveryReport {
    fn warn(&mut self, message: String) {
        tracing::warn!(%message, "session recovery");
        self.warnings.push(message);
    }

    fn finish(mut self) -> Self {
        self.recovered = self.errors.is_empty() && self.warnings.is_empty();
        self
    }
}

/// Rebuilds a consistent state from whatever `value` holds. Never fails: an
/// unusable snapshot yields the default single-pane layout and an error entry.
pub fn recover_session(value: &Value, config: LayoutConfig) -> (WorkbenchState, RecoveryReport) {
    let mut report = RecoveryReport::default();
    let Some(root) = value.as_object() else {
        report
            .errors
            .push(StateError::corruption("session snapshot is not a JSON object"));
        let state = WorkbenchState::with_default_layout(config, WorkbenchSettings::default());
        return (state, report.finish());
    };

    let settings = match root.get("settings") {
        Some(raw) => serde_json::from_value(raw.clone()).unwrap_or_else(|err| {
            report.warn(format!("settings unreadable ({err}); using defaults"));
            WorkbenchSettings::default()
        }),
        None => {
            report.warn("settings missing; using defaults".to_string());
            WorkbenchSettings::default()
        }
    };
    let mut state = WorkbenchState::new(config, settings);

    restore_tabs(&mut state, read_list(root, "tabs", true, &mut report), &mut report);
    let layout = root.get("layout").and_then(Value::as_object);
    if layout.is_none() {
        report.warn("layout missing or malformed".to_string());
    }
    let claimed = restore_panes(
        &mut state,
        read_list(root, "panes", true, &mut report),
        &mut report,
    );
    let active = read_active_pane(root, layout);
    adopt_homeless(&mut state, &claimed, active, &mut report);
    restore_splitters(
        &mut state,
        layout.map(|l| read_list(l, "splitters", true, &mut report)).unwrap_or_default(),
        &mut report,
    );
    if let Some(declared) = layout
        .and_then(|l| l.get("type"))
        .and_then(|t| serde_json::from_value::<LayoutKind>(t.clone()).ok())
    {
        if declared != state.layout.kind {
            report.warn(format!(
                "layout type {declared:?} disagrees with splitters; recomputed"
            ));
        }
    }

    restore_groups(
        &mut state,
        read_list(root, "tabGroups", true, &mut report),
        &mut report,
    );
    restore_stacks(
        &mut state,
        read_list(root, "tabStacks", false, &mut report),
        &mut report,
    );
    repair_related(&mut state, &mut report);

    let recent: Vec<PathBuf> = read_list(root, "recentFiles", true, &mut report);
    state.recent_files = recent;
    state.recent_files.truncate(state.config.max_recent_files);

    for layout in read_list::<WorkspaceLayout>(root, "workspaceLayouts", false, &mut report) {
        state.workspace_layouts.insert(layout.id, layout);
    }
    state.bump_ids_past_contents();

    for problem in state.check_invariants() {
        report.errors.push(StateError::invalid_reference(problem));
    }
    (state, report.finish())
}

/// Decodes an array field entry by entry, dropping entries that do not parse.
fn read_list<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &str,
    required: bool,
    report: &mut RecoveryReport,
) -> Vec<T> {
    let Some(raw) = object.get(key) else {
        if required {
            report.warn(format!("`{key}` missing"));
        }
        return Vec::new();
    };
    let Some(items) = raw.as_array() else {
        report.warn(format!("`{key}` is not an array; ignored"));
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                report.warn(format!("dropped malformed `{key}` entry #{index}: {err}"));
                None
            }
        })
        .collect()
}

fn read_active_pane(root: &Map<String, Value>, layout: Option<&Map<String, Value>>) -> Option<PaneId> {
    let parse = |v: &Value| serde_json::from_value::<PaneId>(v.clone()).ok();
    root.get("activePane")
        .and_then(parse)
        .or_else(|| layout.and_then(|l| l.get("activePane")).and_then(parse))
}

fn restore_tabs(state: &mut WorkbenchState, tabs: Vec<Tab>, report: &mut RecoveryReport) {
    for mut tab in tabs {
        if state.tabs.contains(tab.id) {
            report.warn(format!("duplicate {} dropped", tab.id));
            continue;
        }
        // Membership is rebuilt from the group and stack lists.
        tab.group_id = None;
        tab.color = None;
        tab.stack_id = None;
        state.tabs.insert(tab);
    }
}

fn restore_panes(
    state: &mut WorkbenchState,
    panes: Vec<Pane>,
    report: &mut RecoveryReport,
) -> FxHashSet<TabId> {
    let mut claimed = FxHashSet::default();
    for mut pane in panes {
        if state.layout.pane(pane.id).is_some() {
            report.warn(format!("duplicate {} dropped", pane.id));
            continue;
        }
        let before = pane.tabs.len();
        pane.tabs
            .retain(|tab| state.tabs.contains(*tab) && claimed.insert(*tab));
        if pane.tabs.len() != before {
            report.warn(format!(
                "{} lost {} unknown or duplicate tab(s)",
                pane.id,
                before - pane.tabs.len()
            ));
        }
        if pane.active_tab.is_some_and(|tab| !pane.contains(tab)) {
            report.warn(format!("{} active tab re-pointed", pane.id));
            pane.active_tab = pane.tabs.first().copied();
        } else if pane.active_tab.is_none() && !pane.tabs.is_empty() {
            pane.active_tab = pane.tabs.first().copied();
        }
        state.layout.panes.insert(pane.id, pane);
    }
    claimed
}

fn adopt_homeless(
    state: &mut WorkbenchState,
    claimed: &FxHashSet<TabId>,
    active: Option<PaneId>,
    report: &mut RecoveryReport,
) {
    if state.layout.pane_count() == 0 {
        if !state.tabs.is_empty() {
            report.warn("no panes recovered; created a default pane".to_string());
        }
        state.insert_pane();
    }
    state.layout.active_pane = active;
    state.layout.repair_active_pane(None);
    if state.layout.active_pane != active {
        report.warn("active pane re-pointed".to_string());
    }

    let homeless: Vec<TabId> = state.tabs.ids().filter(|t| !claimed.contains(t)).collect();
    if homeless.is_empty() {
        return;
    }
    report.warn(format!("{} tab(s) without a pane adopted", homeless.len()));
    let target = state.layout.pane_ids().next();
    if let Some(pane) = target.and_then(|id| state.layout.pane_mut(id)) {
        pane.tabs.extend(homeless);
        if pane.active_tab.is_none() {
            pane.active_tab = pane.tabs.first().copied();
        }
    }
}

fn restore_splitters(
    state: &mut WorkbenchState,
    splitters: Vec<Splitter>,
    report: &mut RecoveryReport,
) {
    for mut splitter in splitters {
        let valid = splitter.pane_a != splitter.pane_b
            && state.layout.pane(splitter.pane_a).is_some()
            && state.layout.pane(splitter.pane_b).is_some()
            && !state.layout.splitters.contains_key(&splitter.id);
        if !valid {
            report.warn(format!("dangling {} dropped", splitter.id));
            continue;
        }
        if !(0.0..=1.0).contains(&splitter.position) {
            report.warn(format!("{} position clamped", splitter.id));
            splitter.position = if splitter.position.is_nan() {
                0.5
            } else {
                splitter.position.clamp(0.0, 1.0)
            };
        }
        state.layout.splitters.insert(splitter.id, splitter);
    }
    state.layout.sync_kind();
}

fn restore_groups(state: &mut WorkbenchState, groups: Vec<TabGroup>, report: &mut RecoveryReport) {
    for mut group in groups {
        if state.groups.contains_key(&group.id) {
            report.warn(format!("duplicate {} dropped", group.id));
            continue;
        }
        let before = group.tabs.len();
        let mut kept = Vec::with_capacity(before);
        for tab in group.tabs {
            let Some(t) = state.tabs.get_mut(tab) else {
                continue;
            };
            if t.group_id.is_some() {
                continue;
            }
            t.group_id = Some(group.id);
            t.color = Some(group.color.clone());
            kept.push(tab);
        }
        if kept.len() != before {
            report.warn(format!("{} lost {} member(s)", group.id, before - kept.len()));
        }
        group.tabs = kept;
        state.groups.insert(group.id, group);
    }
}

fn restore_stacks(state: &mut WorkbenchState, stacks: Vec<TabStack>, report: &mut RecoveryReport) {
    for mut stack in stacks {
        let Some(pane) = state.layout.pane(stack.pane_id) else {
            report.warn(format!("{} points at a missing pane; dropped", stack.id));
            continue;
        };
        let before = stack.tabs.len();
        let candidates: Vec<TabId> = stack
            .tabs
            .iter()
            .copied()
            .filter(|tab| pane.contains(*tab))
            .collect();
        let mut kept = Vec::with_capacity(candidates.len());
        for tab in candidates {
            if let Some(t) = state.tabs.get_mut(tab).filter(|t| t.stack_id.is_none()) {
                t.stack_id = Some(stack.id);
                kept.push(tab);
            }
        }
        if kept.len() != before {
            report.warn(format!("{} lost {} member(s)", stack.id, before - kept.len()));
        }
        if kept.is_empty() {
            continue;
        }
        stack.active_tab_index = stack.active_tab_index.min(kept.len() - 1);
        stack.tabs = kept;
        state.stacks.insert(stack.id, stack);
    }
}

/// Drops links to unknown tabs and restores symmetry for one-sided links.
fn repair_related(state: &mut WorkbenchState, report: &mut RecoveryReport) {
    let ids: Vec<TabId> = state.tabs.ids().collect();
    let known: FxHashSet<TabId> = ids.iter().copied().collect();
    let mut pairs = Vec::new();
    for id in ids {
        let Some(tab) = state.tabs.get_mut(id) else {
            continue;
        };
        let before = tab.related_tabs.len();
        tab.related_tabs
            .retain(|other| *other != id && known.contains(other));
        if tab.related_tabs.len() != before {
            report.warn(format!("{id} lost dangling related link(s)"));
        }
        pairs.extend(tab.related_tabs.iter().map(|other| (*other, id)));
    }
    for (tab, other) in pairs {
        if let Some(t) = state.tabs.get_mut(tab) {
            if t.related_tabs.insert(other) {
                report.warn(format!("{tab} -> {other} link restored"));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/recovery.rs"]
mod tests;

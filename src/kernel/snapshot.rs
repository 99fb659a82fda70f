//! Serialized session shape (camelCase JSON) and the strict state <-> snapshot mapping.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::WorkbenchError;
use super::groups::TabGroup;
use super::ids::PaneId;
use super::layout::{Layout, LayoutKind, Pane, Splitter};
use super::services::ports::{LayoutConfig, WorkbenchSettings};
use super::stacks::TabStack;
use super::state::WorkbenchState;
use super::tabs::Tab;
use super::workspace_layouts::WorkspaceLayout;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    #[serde(rename = "type")]
    pub kind: LayoutKind,
    pub panes: Vec<PaneId>,
    pub splitters: Vec<Splitter>,
    pub active_pane: Option<PaneId>,
}

impl LayoutSnapshot {
    pub(crate) fn capture(layout: &Layout) -> Self {
        Self {
            kind: layout.kind,
            panes: layout.pane_ids().collect(),
            splitters: layout.splitters().cloned().collect(),
            active_pane: layout.active_pane,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub saved_at: u64,
    pub tabs: Vec<Tab>,
    pub panes: Vec<Pane>,
    pub tab_groups: Vec<TabGroup>,
    pub layout: LayoutSnapshot,
    pub active_pane: Option<PaneId>,
    pub recent_files: Vec<PathBuf>,
    pub settings: WorkbenchSettings,
    #[serde(default)]
    pub tab_stacks: Vec<TabStack>,
    #[serde(default)]
    pub workspace_layouts: Vec<WorkspaceLayout>,
}

impl SessionSnapshot {
    /// Strict decode: any schema mismatch is reported as corruption.
    pub fn from_value(value: Value) -> Result<Self, WorkbenchError> {
        serde_json::from_value(value)
            .map_err(|err| WorkbenchError::Corruption(format!("invalid session snapshot: {err}")))
    }

    pub fn to_value(&self) -> Result<Value, WorkbenchError> {
        serde_json::to_value(self)
            .map_err(|err| WorkbenchError::Corruption(format!("unserializable session: {err}")))
    }
}

impl WorkbenchState {
    pub fn snapshot(&self, saved_at: u64) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at,
            tabs: self.tabs.iter().cloned().collect(),
            panes: self.layout.panes().cloned().collect(),
            tab_groups: self.groups.values().cloned().collect(),
            layout: LayoutSnapshot::capture(&self.layout),
            active_pane: self.layout.active_pane,
            recent_files: self.recent_files.clone(),
            settings: self.settings.clone(),
            tab_stacks: self.stacks.values().cloned().collect(),
            workspace_layouts: self.workspace_layouts.values().cloned().collect(),
        }
    }

    /// Rebuilds a state verbatim from a snapshot. Navigation history is not
    /// persisted and starts empty. Fails if the result breaks an invariant.
    pub fn from_snapshot(
        snapshot: SessionSnapshot,
        config: LayoutConfig,
    ) -> Result<Self, WorkbenchError> {
        let mut state = Self::new(config, snapshot.settings);
        for tab in snapshot.tabs {
            state.tabs.insert(tab);
        }
        state.layout.panes = snapshot.panes.into_iter().map(|p| (p.id, p)).collect();
        state.layout.splitters = snapshot
            .layout
            .splitters
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        state.layout.kind = snapshot.layout.kind;
        state.layout.active_pane = snapshot.active_pane.or(snapshot.layout.active_pane);
        state.groups = by_id(snapshot.tab_groups, |g| g.id);
        state.stacks = by_id(snapshot.tab_stacks, |s| s.id);
        state.workspace_layouts = by_id(snapshot.workspace_layouts, |l| l.id);
        state.recent_files = snapshot.recent_files;
        state.bump_ids_past_contents();

        let problems = state.check_invariants();
        if !problems.is_empty() {
            return Err(WorkbenchError::Corruption(problems.join("; ")));
        }
        Ok(state)
    }
}

fn by_id<K: Ord, V>(items: Vec<V>, key: impl Fn(&V) -> K) -> BTreeMap<K, V> {
    items.into_iter().map(|item| (key(&item), item)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/snapshot.rs"]
mod tests;

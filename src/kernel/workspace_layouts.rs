use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::groups::TabGroup;
use super::ids::{TabId, WorkspaceLayoutId};
use super::layout::Pane;
use super::snapshot::LayoutSnapshot;
use super::stacks::TabStack;
use super::state::WorkbenchState;

/// A named copy of the pane graph plus groups and stacks. Never mutated after save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceLayout {
    pub id: WorkspaceLayoutId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub layout: LayoutSnapshot,
    pub panes: Vec<Pane>,
    #[serde(default)]
    pub tab_groups: Vec<TabGroup>,
    #[serde(default)]
    pub tab_stacks: Vec<TabStack>,
    pub created_at: u64,
    #[serde(default)]
    pub is_default: bool,
}

impl WorkbenchState {
    pub(crate) fn save_workspace_layout(
        &mut self,
        name: String,
        description: String,
        now: u64,
    ) -> WorkspaceLayoutId {
        let id = self.ids.workspace_layout();
        let saved = WorkspaceLayout {
            id,
            name,
            description,
            layout: LayoutSnapshot::capture(&self.layout),
            panes: self.layout.panes().cloned().collect(),
            tab_groups: self.groups.values().cloned().collect(),
            tab_stacks: self.stacks.values().cloned().collect(),
            created_at: now,
            is_default: false,
        };
        self.workspace_layouts.insert(id, saved);
        tracing::debug!(layout = %id, "workspace layout saved");
        id
    }

    /// Restores a saved arrangement over the tabs open right now. Saved ids
    /// that no longer exist are dropped; open tabs the layout does not know
    /// land in the restored active pane.
    pub(crate) fn load_workspace_layout(&mut self, id: WorkspaceLayoutId) -> bool {
        let Some(saved) = self.workspace_layouts.get(&id).cloned() else {
            return false;
        };

        let mut claimed = FxHashSet::default();
        let mut panes = BTreeMap::new();
        for mut pane in saved.panes {
            pane.tabs
                .retain(|tab| self.tabs.contains(*tab) && claimed.insert(*tab));
            if pane.active_tab.is_some_and(|tab| !pane.contains(tab)) {
                pane.active_tab = pane.tabs.first().copied();
            }
            panes.insert(pane.id, pane);
        }
        if panes.is_empty() {
            tracing::debug!(layout = %id, "workspace layout has no panes; ignored");
            return false;
        }

        self.layout.panes = panes;
        self.layout.splitters = saved
            .layout
            .splitters
            .into_iter()
            .filter(|s| {
                s.pane_a != s.pane_b
                    && self.layout.panes.contains_key(&s.pane_a)
                    && self.layout.panes.contains_key(&s.pane_b)
            })
            .map(|s| (s.id, s))
            .collect();
        self.layout.sync_kind();
        self.layout.active_pane = saved.layout.active_pane;
        self.layout.repair_active_pane(None);

        let homeless: Vec<TabId> = self.tabs.ids().filter(|t| !claimed.contains(t)).collect();
        if let Some(pane) = self
            .layout
            .active_pane
            .and_then(|pane| self.layout.pane_mut(pane))
        {
            for tab in homeless {
                pane.tabs.push(tab);
            }
            if pane.active_tab.is_none() {
                pane.active_tab = pane.tabs.first().copied();
            }
        }

        self.restore_groups(saved.tab_groups);
        self.restore_stacks(saved.tab_stacks);
        let live: FxHashSet<_> = self.layout.pane_ids().collect();
        self.history.retain(|pane, _| live.contains(pane));
        for (pane, history) in self.history.iter_mut() {
            let Some(held) = self.layout.pane(*pane) else {
                continue;
            };
            let moved: Vec<TabId> = history
                .entries()
                .iter()
                .copied()
                .filter(|tab| !held.tabs.contains(tab))
                .collect();
            for tab in moved {
                history.remove(tab);
            }
        }
        tracing::debug!(layout = %id, "workspace layout loaded");
        true
    }

    fn restore_groups(&mut self, groups: Vec<TabGroup>) {
        for tab in self.tabs.ids().collect::<Vec<_>>() {
            if let Some(t) = self.tabs.get_mut(tab) {
                t.group_id = None;
                t.color = None;
            }
        }
        self.groups.clear();
        for mut group in groups {
            group.tabs.retain(|tab| {
                self.tabs
                    .get(*tab)
                    .is_some_and(|t| t.group_id.is_none())
            });
            for tab in &group.tabs {
                if let Some(t) = self.tabs.get_mut(*tab) {
                    t.group_id = Some(group.id);
                    t.color = Some(group.color.clone());
                }
            }
            self.groups.insert(group.id, group);
        }
    }

    fn restore_stacks(&mut self, stacks: Vec<TabStack>) {
        for tab in self.tabs.ids().collect::<Vec<_>>() {
            if let Some(t) = self.tabs.get_mut(tab) {
                t.stack_id = None;
            }
        }
        self.stacks.clear();
        for mut stack in stacks {
            let Some(pane) = self.layout.pane(stack.pane_id) else {
                continue;
            };
            let members: Vec<TabId> = stack
                .tabs
                .iter()
                .copied()
                .filter(|tab| pane.contains(*tab))
                .collect();
            stack.tabs = members
                .into_iter()
                .filter(|tab| self.tabs.get(*tab).is_some_and(|t| t.stack_id.is_none()))
                .collect();
            if stack.tabs.is_empty() {
                continue;
            }
            stack.active_tab_index = stack.active_tab_index.min(stack.tabs.len() - 1);
            for tab in &stack.tabs {
                if let Some(t) = self.tabs.get_mut(*tab) {
                    t.stack_id = Some(stack.id);
                }
            }
            self.stacks.insert(stack.id, stack);
        }
    }

    pub(crate) fn delete_workspace_layout(&mut self, id: WorkspaceLayoutId) -> bool {
        self.workspace_layouts.remove(&id).is_some()
    }

    /// Marks `id` as the default layout; every other layout loses the flag.
    pub(crate) fn set_default_workspace_layout(&mut self, id: WorkspaceLayoutId) -> bool {
        if !self.workspace_layouts.contains_key(&id) {
            return false;
        }
        let mut changed = false;
        for layout in self.workspace_layouts.values_mut() {
            let is_default = layout.id == id;
            if layout.is_default != is_default {
                layout.is_default = is_default;
                changed = true;
            }
        }
        changed
    }

    pub fn default_workspace_layout(&self) -> Option<&WorkspaceLayout> {
        self.workspace_layouts.values().find(|l| l.is_default)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/workspace_layouts.rs"]
mod tests;

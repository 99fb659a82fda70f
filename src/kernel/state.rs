use std::collections::BTreeMap;
use std::path::PathBuf;

use rustc_hash::FxHashSet;

use super::groups::TabGroup;
use super::history::NavigationHistory;
use super::ids::{GroupId, IdAllocator, PaneId, StackId, TabId, WorkspaceLayoutId};
use super::layout::{Layout, LayoutKind, Pane, PaneSize};
use super::services::ports::{LayoutConfig, WorkbenchSettings};
use super::stacks::TabStack;
use super::tabs::{Tab, TabRegistry};
use super::workspace_layouts::WorkspaceLayout;

/// The whole pane/tab store. Only [`super::Store::dispatch`] mutates it.
#[derive(Debug, Clone)]
pub struct WorkbenchState {
    pub(crate) config: LayoutConfig,
    pub(crate) settings: WorkbenchSettings,
    pub(crate) tabs: TabRegistry,
    pub(crate) layout: Layout,
    pub(crate) groups: BTreeMap<GroupId, TabGroup>,
    pub(crate) stacks: BTreeMap<StackId, TabStack>,
    pub(crate) history: BTreeMap<PaneId, NavigationHistory>,
    pub(crate) recent_files: Vec<PathBuf>,
    pub(crate) workspace_layouts: BTreeMap<WorkspaceLayoutId, WorkspaceLayout>,
    pub(crate) ids: IdAllocator,
}

impl WorkbenchState {
    /// An empty store: no panes, no tabs.
    pub fn new(config: LayoutConfig, settings: WorkbenchSettings) -> Self {
        Self {
            config,
            settings,
            tabs: TabRegistry::new(),
            layout: Layout::default(),
            groups: BTreeMap::new(),
            stacks: BTreeMap::new(),
            history: BTreeMap::new(),
            recent_files: Vec::new(),
            workspace_layouts: BTreeMap::new(),
            ids: IdAllocator::new(),
        }
    }

    /// The fallback layout: exactly one empty, active pane.
    pub fn with_default_layout(config: LayoutConfig, settings: WorkbenchSettings) -> Self {
        let mut state = Self::new(config, settings);
        state.insert_pane();
        state
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn settings(&self) -> &WorkbenchSettings {
        &self.settings
    }

    pub fn tabs(&self) -> &TabRegistry {
        &self.tabs
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn groups(&self) -> impl Iterator<Item = &TabGroup> {
        self.groups.values()
    }

    pub fn group(&self, id: GroupId) -> Option<&TabGroup> {
        self.groups.get(&id)
    }

    pub fn stacks(&self) -> impl Iterator<Item = &TabStack> {
        self.stacks.values()
    }

    pub fn stack(&self, id: StackId) -> Option<&TabStack> {
        self.stacks.get(&id)
    }

    pub fn history(&self, pane: PaneId) -> Option<&NavigationHistory> {
        self.history.get(&pane)
    }

    pub fn recent_files(&self) -> &[PathBuf] {
        &self.recent_files
    }

    pub fn workspace_layouts(&self) -> impl Iterator<Item = &WorkspaceLayout> {
        self.workspace_layouts.values()
    }

    pub fn workspace_layout(&self, id: WorkspaceLayoutId) -> Option<&WorkspaceLayout> {
        self.workspace_layouts.get(&id)
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.get(id)
    }

    pub fn active_pane(&self) -> Option<&Pane> {
        self.layout.active_pane.and_then(|id| self.layout.pane(id))
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_pane()
            .and_then(|pane| pane.active_tab)
            .and_then(|id| self.tabs.get(id))
    }

    pub fn tabs_by_pane(&self, pane: PaneId) -> Vec<&Tab> {
        self.layout
            .pane(pane)
            .map(|pane| pane.tabs.iter().filter_map(|id| self.tabs.get(*id)).collect())
            .unwrap_or_default()
    }

    pub fn tabs_by_group(&self, group: GroupId) -> Vec<&Tab> {
        self.groups
            .get(&group)
            .map(|g| g.tabs.iter().filter_map(|id| self.tabs.get(*id)).collect())
            .unwrap_or_default()
    }

    pub fn tabs_by_stack(&self, stack: StackId) -> Vec<&Tab> {
        self.stacks
            .get(&stack)
            .map(|s| s.tabs.iter().filter_map(|id| self.tabs.get(*id)).collect())
            .unwrap_or_default()
    }

    pub fn has_dirty_tabs(&self) -> bool {
        self.tabs.dirty().next().is_some()
    }

    pub(crate) fn insert_pane(&mut self) -> PaneId {
        let id = self.ids.pane();
        let size = PaneSize::new(self.config.default_pane_width, self.config.default_pane_height);
        self.layout.panes.insert(id, Pane::new(id, size));
        if self.layout.active_pane.is_none() {
            self.layout.active_pane = Some(id);
        }
        id
    }

    /// Removes every reference to `tab` outside of the panes and drops it from the registry.
    pub(crate) fn forget_tab(&mut self, tab: TabId) -> Option<Tab> {
        let removed = self.tabs.remove(tab)?;

        if let Some(group) = removed.group_id.and_then(|id| self.groups.get_mut(&id)) {
            group.tabs.retain(|t| *t != tab);
        }
        if let Some(stack_id) = removed.stack_id {
            self.detach_from_stack(stack_id, tab);
        }
        for other in &removed.related_tabs {
            if let Some(other) = self.tabs.get_mut(*other) {
                other.related_tabs.remove(&tab);
            }
        }
        for history in self.history.values_mut() {
            history.remove(tab);
        }
        Some(removed)
    }

    pub(crate) fn bump_ids_past_contents(&mut self) {
        let mut ids = IdAllocator::new();
        for tab in self.tabs.ids() {
            ids.observe(tab.raw());
        }
        for pane in self.layout.pane_ids() {
            ids.observe(pane.raw());
        }
        for splitter in self.layout.splitters.keys() {
            ids.observe(splitter.raw());
        }
        for group in self.groups.keys() {
            ids.observe(group.raw());
        }
        for stack in self.stacks.keys() {
            ids.observe(stack.raw());
        }
        for layout in self.workspace_layouts.keys() {
            ids.observe(layout.raw());
        }
        self.ids = ids;
    }

    /// Lists every broken structural invariant. Empty means consistent.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut problems = Vec::new();

        match self.layout.active_pane {
            Some(id) if self.layout.pane(id).is_none() => {
                problems.push(format!("active pane {id} does not exist"));
            }
            None if self.layout.pane_count() > 0 => {
                problems.push("panes exist but no pane is active".to_string());
            }
            _ => {}
        }

        let single = self.layout.kind == LayoutKind::Single;
        if single != self.layout.splitters.is_empty() {
            problems.push(format!(
                "layout kind {:?} disagrees with {} splitter(s)",
                self.layout.kind,
                self.layout.splitters.len()
            ));
        }

        let mut owned = FxHashSet::default();
        for pane in self.layout.panes() {
            for tab in &pane.tabs {
                if !self.tabs.contains(*tab) {
                    problems.push(format!("{} lists unknown {tab}", pane.id));
                }
                if !owned.insert(*tab) {
                    problems.push(format!("{tab} is listed by more than one pane"));
                }
            }
            if let Some(active) = pane.active_tab {
                if !pane.contains(active) {
                    problems.push(format!("{} active tab {active} is not in the pane", pane.id));
                }
            }
        }
        for tab in self.tabs.iter() {
            if !owned.contains(&tab.id) {
                problems.push(format!("{} is not owned by any pane", tab.id));
            }
            for other in &tab.related_tabs {
                let symmetric = self
                    .tabs
                    .get(*other)
                    .is_some_and(|o| o.related_tabs.contains(&tab.id));
                if !symmetric {
                    problems.push(format!("{} -> {other} link is not symmetric", tab.id));
                }
            }
            if let Some(group) = tab.group_id {
                match self.groups.get(&group) {
                    Some(g) if g.tabs.contains(&tab.id) => {
                        if tab.color != g.color_value() {
                            problems.push(format!("{} color differs from {group}", tab.id));
                        }
                    }
                    _ => problems.push(format!("{} points at foreign {group}", tab.id)),
                }
            }
        }
        for splitter in self.layout.splitters() {
            if self.layout.pane(splitter.pane_a).is_none()
                || self.layout.pane(splitter.pane_b).is_none()
            {
                problems.push(format!("{} references a missing pane", splitter.id));
            }
        }
        for group in self.groups.values() {
            for tab in &group.tabs {
                if self.tabs.get(*tab).and_then(|t| t.group_id) != Some(group.id) {
                    problems.push(format!("{} member {tab} does not point back", group.id));
                }
            }
        }
        problems
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;

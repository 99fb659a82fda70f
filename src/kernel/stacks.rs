use serde::{Deserialize, Serialize};

use super::ids::{PaneId, StackId, TabId};
use super::services::ports::StackingStrategy;
use super::state::WorkbenchState;

/// Advisory overflow container for tabs of one pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabStack {
    pub id: StackId,
    pub pane_id: PaneId,
    pub tabs: Vec<TabId>,
    #[serde(default)]
    pub active_tab_index: usize,
    #[serde(default = "stacked_default")]
    pub is_stacked: bool,
}

fn stacked_default() -> bool {
    true
}

impl TabStack {
    pub fn active_tab(&self) -> Option<TabId> {
        self.tabs.get(self.active_tab_index).copied()
    }

    fn clamp_active(&mut self) {
        self.active_tab_index = self
            .active_tab_index
            .min(self.tabs.len().saturating_sub(1));
    }
}

impl WorkbenchState {
    pub fn should_stack_tabs(&self, _pane: PaneId, tab_count: usize) -> bool {
        self.settings.auto_stacking
            && self.settings.stacking_strategy == StackingStrategy::Overflow
            && tab_count > self.settings.max_visible_tabs
    }

    pub(crate) fn create_stack(&mut self, pane: PaneId, tabs: Vec<TabId>) -> Option<StackId> {
        if self.layout.pane(pane).is_none() {
            return None;
        }
        let id = self.ids.stack();
        self.stacks.insert(
            id,
            TabStack {
                id,
                pane_id: pane,
                tabs: Vec::new(),
                active_tab_index: 0,
                is_stacked: true,
            },
        );
        for tab in tabs {
            self.add_tab_to_stack(tab, id);
        }
        if self.stacks.get(&id).is_some_and(|s| s.tabs.is_empty()) {
            self.stacks.remove(&id);
            return None;
        }
        tracing::debug!(stack = %id, pane = %pane, "tab stack created");
        Some(id)
    }

    pub(crate) fn add_tab_to_stack(&mut self, tab: TabId, stack: StackId) -> bool {
        if !self.stacks.contains_key(&stack) || !self.tabs.contains(tab) {
            return false;
        }
        let previous = self.tabs.get(tab).and_then(|t| t.stack_id);
        if previous == Some(stack) {
            return false;
        }
        if let Some(previous) = previous {
            self.detach_from_stack(previous, tab);
        }
        if let Some(s) = self.stacks.get_mut(&stack) {
            s.tabs.push(tab);
        }
        if let Some(t) = self.tabs.get_mut(tab) {
            t.stack_id = Some(stack);
        }
        true
    }

    pub(crate) fn remove_tab_from_stack(&mut self, tab: TabId) -> bool {
        let Some(stack) = self.tabs.get(tab).and_then(|t| t.stack_id) else {
            return false;
        };
        self.detach_from_stack(stack, tab);
        if let Some(t) = self.tabs.get_mut(tab) {
            t.stack_id = None;
        }
        true
    }

    /// Drops `tab` from the stack's member list; an emptied stack is removed.
    pub(crate) fn detach_from_stack(&mut self, stack: StackId, tab: TabId) {
        let Some(s) = self.stacks.get_mut(&stack) else {
            return;
        };
        s.tabs.retain(|t| *t != tab);
        s.clamp_active();
        if s.tabs.is_empty() {
            self.stacks.remove(&stack);
        }
    }

    pub(crate) fn unstack(&mut self, stack: StackId) -> bool {
        let Some(removed) = self.stacks.remove(&stack) else {
            return false;
        };
        for tab in removed.tabs {
            if let Some(t) = self.tabs.get_mut(tab) {
                t.stack_id = None;
            }
        }
        true
    }

    pub(crate) fn set_stack_active_index(&mut self, stack: StackId, index: usize) -> bool {
        let Some(s) = self.stacks.get_mut(&stack) else {
            return false;
        };
        let index = index.min(s.tabs.len().saturating_sub(1));
        if s.active_tab_index == index {
            return false;
        }
        s.active_tab_index = index;
        true
    }

    pub(crate) fn toggle_stack(&mut self, stack: StackId) -> bool {
        let Some(s) = self.stacks.get_mut(&stack) else {
            return false;
        };
        s.is_stacked = !s.is_stacked;
        true
    }

    /// Stacks every tab past `max_visible_tabs` that is not stacked yet.
    pub(crate) fn auto_stack_pane(&mut self, pane: PaneId) -> Option<StackId> {
        let tabs = self.layout.pane(pane)?.tabs.clone();
        if !self.should_stack_tabs(pane, tabs.len()) {
            return None;
        }
        let overflow: Vec<TabId> = tabs
            .into_iter()
            .skip(self.settings.max_visible_tabs)
            .filter(|id| self.tabs.get(*id).is_some_and(|t| t.stack_id.is_none()))
            .collect();
        if overflow.is_empty() {
            return None;
        }

        let existing = self
            .stacks
            .values()
            .find(|s| s.pane_id == pane)
            .map(|s| s.id);
        match existing {
            Some(stack) => {
                for tab in overflow {
                    self.add_tab_to_stack(tab, stack);
                }
                Some(stack)
            }
            None => self.create_stack(pane, overflow),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/stacks.rs"]
mod tests;

use super::ids::{PaneId, TabId};
use super::state::WorkbenchState;

/// Back/forward list of tabs visited in one pane, most recent last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationHistory {
    entries: Vec<TabId>,
    current_index: usize,
    max_size: usize,
}

impl NavigationHistory {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            current_index: 0,
            max_size: max_size.max(1),
        }
    }

    pub fn entries(&self) -> &[TabId] {
        &self.entries
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<TabId> {
        self.entries.get(self.current_index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a visit: an existing entry moves to the end, the oldest falls off.
    pub fn push(&mut self, tab: TabId) {
        self.entries.retain(|t| *t != tab);
        self.entries.push(tab);
        if self.entries.len() > self.max_size {
            let overflow = self.entries.len() - self.max_size;
            self.entries.drain(..overflow);
        }
        self.current_index = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> Option<TabId> {
        if self.entries.is_empty() || self.current_index == 0 {
            return None;
        }
        self.current_index -= 1;
        self.current()
    }

    pub fn forward(&mut self) -> Option<TabId> {
        if self.current_index + 1 >= self.entries.len() {
            return None;
        }
        self.current_index += 1;
        self.current()
    }

    pub(crate) fn remove(&mut self, tab: TabId) {
        let Some(index) = self.entries.iter().position(|t| *t == tab) else {
            return;
        };
        self.entries.remove(index);
        if index < self.current_index {
            self.current_index -= 1;
        }
        self.current_index = self
            .current_index
            .min(self.entries.len().saturating_sub(1));
    }
}

impl WorkbenchState {
    pub(crate) fn add_to_history(&mut self, pane: PaneId, tab: TabId) {
        let max = self.config.max_history;
        self.history
            .entry(pane)
            .or_insert_with(|| NavigationHistory::new(max))
            .push(tab);
    }

    /// Steps back in `pane`'s history and activates the tab found there.
    pub(crate) fn navigate_back(&mut self, pane: PaneId) -> Option<TabId> {
        let tab = self.history.get_mut(&pane)?.back()?;
        self.focus_tab_in_pane(pane, tab);
        Some(tab)
    }

    pub(crate) fn navigate_forward(&mut self, pane: PaneId) -> Option<TabId> {
        let tab = self.history.get_mut(&pane)?.forward()?;
        self.focus_tab_in_pane(pane, tab);
        Some(tab)
    }

    fn focus_tab_in_pane(&mut self, pane: PaneId, tab: TabId) {
        if let Some(p) = self.layout.pane_mut(pane) {
            p.set_active(tab);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/history.rs"]
mod tests;

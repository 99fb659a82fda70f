use std::path::PathBuf;

use crate::kernel::effect::Effect;
use crate::kernel::ids::{PaneId, TabId};
use crate::kernel::state::WorkbenchState;

use super::state::{Tab, TabOptions, TabUpdate};

impl WorkbenchState {
    /// Opens a new tab in `pane`, the active pane, or a fresh pane, in that order.
    pub(crate) fn create_tab(
        &mut self,
        options: TabOptions,
        pane: Option<PaneId>,
        now: u64,
    ) -> TabId {
        let pane = self.resolve_target_pane(pane);
        let id = self.ids.tab();
        self.tabs.insert(Tab::new(id, options, now));
        if let Some(p) = self.layout.pane_mut(pane) {
            p.insert_tab(id, None);
        }
        self.focus_tab(pane, id, now);
        tracing::debug!(tab = %id, pane = %pane, "tab created");
        id
    }

    /// Activates the tab already showing `path`, or opens a new one for it.
    pub(crate) fn open_file(
        &mut self,
        path: PathBuf,
        content: String,
        language: Option<String>,
        pane: Option<PaneId>,
        now: u64,
    ) -> TabId {
        if let Some(existing) = self.tabs.find_by_path(&path) {
            self.activate_tab(existing, now);
            return existing;
        }
        let mut options = TabOptions::for_file(path, content);
        options.language = language;
        self.create_tab(options, pane, now)
    }

    fn resolve_target_pane(&mut self, requested: Option<PaneId>) -> PaneId {
        if let Some(pane) = requested.filter(|id| self.layout.pane(*id).is_some()) {
            return pane;
        }
        if let Some(pane) = self.layout.active_pane.filter(|id| self.layout.pane(*id).is_some()) {
            return pane;
        }
        let first = self.layout.pane_ids().next();
        match first {
            Some(pane) => {
                self.layout.active_pane = Some(pane);
                pane
            }
            None => self.insert_pane(),
        }
    }

    pub(crate) fn activate_tab(&mut self, tab: TabId, now: u64) -> bool {
        let Some(pane) = self.layout.pane_of(tab) else {
            return false;
        };
        self.focus_tab(pane, tab, now);
        true
    }

    /// Makes `tab` the active tab of `pane`, focuses the pane and records the visit.
    pub(crate) fn focus_tab(&mut self, pane: PaneId, tab: TabId, now: u64) {
        if let Some(p) = self.layout.pane_mut(pane) {
            p.set_active(tab);
        }
        self.layout.active_pane = Some(pane);
        if let Some(t) = self.tabs.get_mut(tab) {
            t.last_activated = now;
        }
        self.add_to_history(pane, tab);
    }

    /// Closes `tab`. A pane left empty is closed too unless it is the last one.
    pub(crate) fn close_tab(&mut self, tab: TabId) -> (bool, Vec<Effect>) {
        let Some(pane) = self.layout.pane_of(tab) else {
            return (false, Vec::new());
        };
        let emptied = match self.layout.pane_mut(pane) {
            Some(p) => {
                p.remove_tab(tab);
                p.is_empty()
            }
            None => false,
        };

        let mut effects = Vec::new();
        self.discard_tab(tab, &mut effects);
        if emptied && self.layout.pane_count() > 1 {
            let (_, closed) = self.close_pane(pane);
            effects.extend(closed);
        }
        tracing::debug!(tab = %tab, "tab closed");
        (true, effects)
    }

    /// Closes every unlocked tab of `tab`'s pane except `tab` itself.
    pub(crate) fn close_other_tabs(&mut self, tab: TabId, now: u64) -> (bool, Vec<Effect>) {
        let Some(pane) = self.layout.pane_of(tab) else {
            return (false, Vec::new());
        };
        let others: Vec<TabId> = self
            .layout
            .pane(pane)
            .map(|p| p.tabs.iter().copied().filter(|t| *t != tab).collect())
            .unwrap_or_default();
        let (mut changed, effects) = self.close_unlocked(others);
        if self.layout.pane(pane).is_some_and(|p| p.active_tab != Some(tab)) {
            self.focus_tab(pane, tab, now);
            changed = true;
        }
        (changed, effects)
    }

    pub(crate) fn close_all_tabs(&mut self, pane: PaneId) -> (bool, Vec<Effect>) {
        let tabs = match self.layout.pane(pane) {
            Some(p) => p.tabs.clone(),
            None => return (false, Vec::new()),
        };
        self.close_unlocked(tabs)
    }

    fn close_unlocked(&mut self, tabs: Vec<TabId>) -> (bool, Vec<Effect>) {
        let mut changed = false;
        let mut effects = Vec::new();
        for tab in tabs {
            if self.tabs.get(tab).map_or(true, |t| t.is_locked) {
                continue;
            }
            let (closed, more) = self.close_tab(tab);
            changed |= closed;
            effects.extend(more);
        }
        (changed, effects)
    }

    /// Drops a tab already removed from its pane, remembering its file.
    pub(crate) fn discard_tab(&mut self, tab: TabId, effects: &mut Vec<Effect>) {
        let Some(removed) = self.forget_tab(tab) else {
            return;
        };
        if let Some(path) = removed.file_path {
            self.push_recent_file(path);
        }
        effects.push(Effect::CancelAutoSave { tab });
    }

    fn push_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| *p != path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.config.max_recent_files);
    }

    pub(crate) fn clear_recent_files(&mut self) -> bool {
        if self.recent_files.is_empty() {
            return false;
        }
        self.recent_files.clear();
        true
    }

    /// Shallow-merges `update` into the tab. A content change marks it dirty
    /// and schedules an auto-save.
    pub(crate) fn update_tab(
        &mut self,
        tab: TabId,
        update: TabUpdate,
        now: u64,
    ) -> (bool, Vec<Effect>) {
        let auto_save = self.settings.auto_save;
        let Some(t) = self.tabs.get_mut(tab) else {
            return (false, Vec::new());
        };

        let mut changed = false;
        let mut effects = Vec::new();
        if let Some(title) = update.title {
            changed |= replace(&mut t.title, title);
        }
        if let Some(language) = update.language {
            changed |= replace(&mut t.language, language);
        }
        if let Some(path) = update.file_path {
            changed |= replace(&mut t.file_path, Some(path));
        }
        if let Some(document) = update.document_id {
            changed |= replace(&mut t.document_id, Some(document));
        }
        // Grouped tabs wear their group's color.
        if let Some(color) = update.color.filter(|_| t.group_id.is_none()) {
            changed |= replace(&mut t.color, Some(color));
        }
        if let Some(content) = update.content {
            if t.content != content {
                t.content = content;
                t.is_dirty = true;
                t.modified_at = now.max(t.modified_at + 1);
                changed = true;
                if auto_save {
                    effects.push(Effect::ScheduleAutoSave { tab });
                }
            }
        }
        (changed, effects)
    }

    /// Moves `tab` from `from` to `to` at `index` (appended when `None`).
    pub(crate) fn move_tab(
        &mut self,
        tab: TabId,
        from: PaneId,
        to: PaneId,
        index: Option<usize>,
        now: u64,
    ) -> bool {
        if !self.layout.pane(from).is_some_and(|p| p.contains(tab))
            || self.layout.pane(to).is_none()
        {
            return false;
        }
        if from == to {
            return self.reorder_tab(tab, index.unwrap_or(usize::MAX));
        }
        self.relocate_tab(tab, from, to, index);
        self.focus_tab(to, tab, now);
        true
    }

    /// Moves `tab` inside its own pane to `index`, clamped to the last slot.
    pub(crate) fn reorder_tab(&mut self, tab: TabId, index: usize) -> bool {
        let Some(pane) = self.layout.pane_of(tab).and_then(|id| self.layout.pane_mut(id)) else {
            return false;
        };
        let Some(current) = pane.position(tab) else {
            return false;
        };
        let target = index.min(pane.tabs.len() - 1);
        if target == current {
            return false;
        }
        let moved = pane.tabs.remove(current);
        pane.tabs.insert(target, moved);
        true
    }

    /// Detaches `tab` from `from` and inserts it into `to` without focusing it.
    pub(crate) fn relocate_tab(
        &mut self,
        tab: TabId,
        from: PaneId,
        to: PaneId,
        index: Option<usize>,
    ) {
        if let Some(p) = self.layout.pane_mut(from) {
            p.remove_tab(tab);
        }
        if let Some(history) = self.history.get_mut(&from) {
            history.remove(tab);
        }
        if let Some(p) = self.layout.pane_mut(to) {
            p.insert_tab(tab, index);
        }
        self.restack_for_pane(tab, to);
    }

    /// Copies `tab` into a new, clean tab placed right after it.
    pub(crate) fn duplicate_tab(&mut self, tab: TabId, now: u64) -> Option<TabId> {
        let original = self.tabs.get(tab)?.clone();
        let pane = self.layout.pane_of(tab)?;
        let id = self.ids.tab();
        let options = TabOptions {
            title: Some(format!("{} (copy)", original.title)),
            content: original.content,
            language: Some(original.language),
            file_path: None,
            document_id: None,
        };
        self.tabs.insert(Tab::new(id, options, now));
        if let Some(p) = self.layout.pane_mut(pane) {
            let after = p.position(tab).map(|i| i + 1);
            p.insert_tab(id, after);
        }
        self.focus_tab(pane, id, now);
        Some(id)
    }

    pub(crate) fn lock_tab(&mut self, tab: TabId, locked: bool) -> bool {
        let Some(t) = self.tabs.get_mut(tab) else {
            return false;
        };
        replace(&mut t.is_locked, locked)
    }

    /// Clears the dirty flag unless the tab was edited after `modified_at`.
    pub(crate) fn mark_saved(&mut self, tab: TabId, modified_at: u64) -> bool {
        let Some(t) = self.tabs.get_mut(tab) else {
            return false;
        };
        if !t.is_dirty || t.modified_at > modified_at {
            return false;
        }
        t.is_dirty = false;
        true
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

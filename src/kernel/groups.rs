use serde::{Deserialize, Serialize};

use super::ids::{GroupId, TabId};
use super::state::WorkbenchState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabGroup {
    pub id: GroupId,
    pub name: String,
    pub color: String,
    pub tabs: Vec<TabId>,
    #[serde(default)]
    pub is_collapsed: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub position: usize,
}

impl TabGroup {
    pub(crate) fn color_value(&self) -> Option<String> {
        Some(self.color.clone())
    }
}

impl WorkbenchState {
    pub(crate) fn create_group(
        &mut self,
        name: String,
        color: String,
        tabs: Vec<TabId>,
    ) -> GroupId {
        let id = self.ids.group();
        let position = self
            .groups
            .values()
            .map(|g| g.position + 1)
            .max()
            .unwrap_or(0);
        self.groups.insert(
            id,
            TabGroup {
                id,
                name,
                color,
                tabs: Vec::new(),
                is_collapsed: false,
                is_locked: false,
                position,
            },
        );
        for tab in tabs {
            self.add_tab_to_group(tab, id);
        }
        tracing::debug!(group = %id, "tab group created");
        id
    }

    /// Moves `tab` into `group`, leaving any previous group.
    pub(crate) fn add_tab_to_group(&mut self, tab: TabId, group: GroupId) -> bool {
        let Some(target) = self.groups.get(&group) else {
            return false;
        };
        if target.is_locked || !self.tabs.contains(tab) {
            return false;
        }
        let previous = self.tabs.get(tab).and_then(|t| t.group_id);
        if previous == Some(group) {
            return false;
        }
        if let Some(previous) = previous {
            if self.groups.get(&previous).is_some_and(|g| g.is_locked) {
                return false;
            }
            if let Some(prev) = self.groups.get_mut(&previous) {
                prev.tabs.retain(|t| *t != tab);
            }
        }

        let color = match self.groups.get_mut(&group) {
            Some(target) => {
                target.tabs.push(tab);
                target.color.clone()
            }
            None => return false,
        };
        if let Some(t) = self.tabs.get_mut(tab) {
            t.group_id = Some(group);
            t.color = Some(color);
        }
        true
    }

    pub(crate) fn remove_tab_from_group(&mut self, tab: TabId) -> bool {
        let Some(group) = self.tabs.get(tab).and_then(|t| t.group_id) else {
            return false;
        };
        if let Some(g) = self.groups.get_mut(&group) {
            if g.is_locked {
                return false;
            }
            g.tabs.retain(|t| *t != tab);
        }
        if let Some(t) = self.tabs.get_mut(tab) {
            t.group_id = None;
            t.color = None;
        }
        true
    }

    pub(crate) fn update_group(
        &mut self,
        group: GroupId,
        name: Option<String>,
        color: Option<String>,
    ) -> bool {
        let Some(g) = self.groups.get_mut(&group) else {
            return false;
        };
        let mut changed = false;
        if let Some(name) = name {
            if g.name != name {
                g.name = name;
                changed = true;
            }
        }
        if let Some(color) = color {
            if g.color != color {
                g.color = color.clone();
                for tab in g.tabs.clone() {
                    if let Some(t) = self.tabs.get_mut(tab) {
                        t.color = Some(color.clone());
                    }
                }
                changed = true;
            }
        }
        changed
    }

    /// Dissolves the group. Member tabs stay open, uncolored.
    pub(crate) fn delete_group(&mut self, group: GroupId) -> bool {
        if self.groups.get(&group).is_some_and(|g| g.is_locked) {
            return false;
        }
        let Some(removed) = self.groups.remove(&group) else {
            return false;
        };
        for tab in removed.tabs {
            if let Some(t) = self.tabs.get_mut(tab) {
                t.group_id = None;
                t.color = None;
            }
        }
        true
    }

    pub(crate) fn toggle_group_collapsed(&mut self, group: GroupId) -> bool {
        let Some(g) = self.groups.get_mut(&group) else {
            return false;
        };
        g.is_collapsed = !g.is_collapsed;
        true
    }

    pub(crate) fn lock_group(&mut self, group: GroupId, locked: bool) -> bool {
        let Some(g) = self.groups.get_mut(&group) else {
            return false;
        };
        if g.is_locked == locked {
            return false;
        }
        g.is_locked = locked;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/groups.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::kernel::ids::{PaneId, SplitterId, TabId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Panes stacked top/bottom; the splitter divides height.
    Horizontal,
    /// Panes side by side; the splitter divides width.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneSize {
    pub width: f32,
    pub height: f32,
}

impl PaneSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn extent(&self, direction: SplitDirection) -> f32 {
        match direction {
            SplitDirection::Vertical => self.width,
            SplitDirection::Horizontal => self.height,
        }
    }

    pub fn set_extent(&mut self, direction: SplitDirection, value: f32) {
        match direction {
            SplitDirection::Vertical => self.width = value,
            SplitDirection::Horizontal => self.height = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pane {
    pub id: PaneId,
    pub tabs: Vec<TabId>,
    #[serde(default)]
    pub active_tab: Option<TabId>,
    pub size: PaneSize,
}

impl Pane {
    pub fn new(id: PaneId, size: PaneSize) -> Self {
        Self {
            id,
            tabs: Vec::new(),
            active_tab: None,
            size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn position(&self, tab: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| *t == tab)
    }

    pub fn contains(&self, tab: TabId) -> bool {
        self.tabs.contains(&tab)
    }

    /// Removes `tab`, returning its former index.
    ///
    /// When the removed tab was active the tab that slides into the vacated
    /// slot becomes active (or the new last tab when it was at the end).
    pub fn remove_tab(&mut self, tab: TabId) -> Option<usize> {
        let index = self.position(tab)?;
        self.tabs.remove(index);
        if self.active_tab == Some(tab) {
            self.active_tab = if self.tabs.is_empty() {
                None
            } else {
                Some(self.tabs[index.min(self.tabs.len() - 1)])
            };
        }
        Some(index)
    }

    /// Inserts `tab` at `index` (clamped), or appends when `index` is `None`.
    pub fn insert_tab(&mut self, tab: TabId, index: Option<usize>) -> usize {
        let index = index.unwrap_or(self.tabs.len()).min(self.tabs.len());
        self.tabs.insert(index, tab);
        index
    }

    pub fn set_active(&mut self, tab: TabId) -> bool {
        if !self.contains(tab) || self.active_tab == Some(tab) {
            return false;
        }
        self.active_tab = Some(tab);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Splitter {
    pub id: SplitterId,
    pub direction: SplitDirection,
    pub position: f32,
    pub pane_a: PaneId,
    pub pane_b: PaneId,
}

impl Splitter {
    pub fn touches(&self, pane: PaneId) -> bool {
        self.pane_a == pane || self.pane_b == pane
    }

    pub fn other(&self, pane: PaneId) -> Option<PaneId> {
        if self.pane_a == pane {
            Some(self.pane_b)
        } else if self.pane_b == pane {
            Some(self.pane_a)
        } else {
            None
        }
    }

    pub fn connects(&self, a: PaneId, b: PaneId) -> bool {
        (self.pane_a == a && self.pane_b == b) || (self.pane_a == b && self.pane_b == a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Single,
    Split,
}

/// A node of the pane graph: panes are vertices, splitters are edges.
#[derive(Debug, Clone, Copy)]
pub enum LayoutNode<'a> {
    Pane(&'a Pane),
    Splitter(&'a Splitter),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub(crate) kind: LayoutKind,
    pub(crate) panes: BTreeMap<PaneId, Pane>,
    pub(crate) splitters: BTreeMap<SplitterId, Splitter>,
    pub(crate) active_pane: Option<PaneId>,
}

impl Layout {
    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn active_pane(&self) -> Option<PaneId> {
        self.active_pane
    }

    pub fn panes(&self) -> impl Iterator<Item = &Pane> {
        self.panes.values()
    }

    pub fn pane_ids(&self) -> impl Iterator<Item = PaneId> + '_ {
        self.panes.keys().copied()
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(&id)
    }

    pub(crate) fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.get_mut(&id)
    }

    pub fn splitters(&self) -> impl Iterator<Item = &Splitter> {
        self.splitters.values()
    }

    pub fn splitter(&self, id: SplitterId) -> Option<&Splitter> {
        self.splitters.get(&id)
    }

    /// The pane currently holding `tab`.
    pub fn pane_of(&self, tab: TabId) -> Option<PaneId> {
        self.panes
            .values()
            .find(|pane| pane.contains(tab))
            .map(|pane| pane.id)
    }

    /// Panes directly connected to `pane` by a splitter, in splitter order.
    pub fn neighbors(&self, pane: PaneId) -> Vec<PaneId> {
        let mut out = Vec::new();
        for splitter in self.splitters.values() {
            if let Some(other) = splitter.other(pane) {
                if !out.contains(&other) && self.panes.contains_key(&other) {
                    out.push(other);
                }
            }
        }
        out
    }

    pub fn splitter_between(&self, a: PaneId, b: PaneId) -> Option<SplitterId> {
        self.splitters
            .values()
            .find(|s| s.connects(a, b))
            .map(|s| s.id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = LayoutNode<'_>> {
        self.panes
            .values()
            .map(LayoutNode::Pane)
            .chain(self.splitters.values().map(LayoutNode::Splitter))
    }

    /// Every pane reachable from `start` through splitters, `start` included.
    pub fn connected_panes(&self, start: PaneId) -> Vec<PaneId> {
        let Some(root) = self.panes.get(&start) else {
            return Vec::new();
        };

        let mut seen_panes = BTreeSet::new();
        let mut seen_splitters = BTreeSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([LayoutNode::Pane(root)]);

        while let Some(node) = queue.pop_front() {
            match node {
                LayoutNode::Pane(pane) => {
                    if !seen_panes.insert(pane.id) {
                        continue;
                    }
                    order.push(pane.id);
                    queue.extend(
                        self.splitters
                            .values()
                            .filter(|s| s.touches(pane.id))
                            .map(LayoutNode::Splitter),
                    );
                }
                LayoutNode::Splitter(splitter) => {
                    if !seen_splitters.insert(splitter.id) {
                        continue;
                    }
                    for id in [splitter.pane_a, splitter.pane_b] {
                        if let Some(pane) = self.panes.get(&id) {
                            queue.push_back(LayoutNode::Pane(pane));
                        }
                    }
                }
            }
        }
        order
    }

    pub(crate) fn sync_kind(&mut self) {
        self.kind = if self.splitters.is_empty() {
            LayoutKind::Single
        } else {
            LayoutKind::Split
        };
    }

    /// Re-points `active_pane` at an existing pane, preferring `fallback`.
    pub(crate) fn repair_active_pane(&mut self, fallback: Option<PaneId>) {
        if self
            .active_pane
            .is_some_and(|id| self.panes.contains_key(&id))
        {
            return;
        }
        self.active_pane = fallback
            .filter(|id| self.panes.contains_key(id))
            .or_else(|| self.panes.keys().next().copied());
    }

    pub(crate) fn remove_splitters_touching(&mut self, pane: PaneId) -> usize {
        let before = self.splitters.len();
        self.splitters.retain(|_, s| !s.touches(pane));
        before - self.splitters.len()
    }
}

use crate::kernel::effect::Effect;
use crate::kernel::ids::{PaneId, SplitterId, TabId};
use crate::kernel::state::WorkbenchState;

use super::state::{LayoutKind, Pane, PaneSize, SplitDirection, Splitter};

impl WorkbenchState {
    pub(crate) fn create_pane(&mut self, size: Option<PaneSize>) -> PaneId {
        let id = self.insert_pane();
        if let Some(size) = size {
            if let Some(pane) = self.layout.pane_mut(id) {
                pane.size = size;
            }
        }
        tracing::debug!(pane = %id, "pane created");
        id
    }

    pub(crate) fn set_active_pane(&mut self, pane: PaneId) -> bool {
        if self.layout.pane(pane).is_none() || self.layout.active_pane == Some(pane) {
            return false;
        }
        self.layout.active_pane = Some(pane);
        true
    }

    /// Splits `pane` in two along `direction`; the new half becomes active.
    pub(crate) fn split_pane(&mut self, pane: PaneId, direction: SplitDirection) -> Option<PaneId> {
        let size = {
            let source = self.layout.pane_mut(pane)?;
            let half = source.size.extent(direction) / 2.0;
            source.size.set_extent(direction, half);
            source.size
        };

        let id = self.ids.pane();
        self.layout.panes.insert(id, Pane::new(id, size));
        let splitter = self.ids.splitter();
        self.layout.splitters.insert(
            splitter,
            Splitter {
                id: splitter,
                direction,
                position: 0.5,
                pane_a: pane,
                pane_b: id,
            },
        );
        self.layout.kind = LayoutKind::Split;
        self.layout.active_pane = Some(id);
        tracing::debug!(source = %pane, pane = %id, ?direction, "pane split");
        Some(id)
    }

    /// Splits the pane holding `tab` and moves the tab into the new half.
    pub(crate) fn split_pane_with_tab(
        &mut self,
        tab: TabId,
        direction: SplitDirection,
        now: u64,
    ) -> Option<PaneId> {
        let source = self.layout.pane_of(tab)?;
        let target = self.split_pane(source, direction)?;
        self.relocate_tab(tab, source, target, None);
        self.focus_tab(target, tab, now);
        Some(target)
    }

    /// Removes `pane`. Its tabs move to an adjacent pane when there is one and
    /// are closed otherwise. The last remaining pane is never closed.
    pub(crate) fn close_pane(&mut self, pane: PaneId) -> (bool, Vec<Effect>) {
        if self.layout.pane(pane).is_none() || self.layout.pane_count() <= 1 {
            return (false, Vec::new());
        }
        let adjacent = self.layout.neighbors(pane).first().copied();
        let Some(closing) = self.layout.panes.remove(&pane) else {
            return (false, Vec::new());
        };

        let mut effects = Vec::new();
        match adjacent {
            Some(target) => {
                self.repoint_stacks(pane, target);
                self.absorb_tabs(target, closing);
            }
            None => {
                for tab in closing.tabs {
                    self.discard_tab(tab, &mut effects);
                }
            }
        }

        self.layout.remove_splitters_touching(pane);
        self.layout.sync_kind();
        if self.layout.active_pane == Some(pane) {
            self.layout.active_pane = None;
        }
        self.layout.repair_active_pane(adjacent);
        self.history.remove(&pane);
        tracing::debug!(pane = %pane, into = ?adjacent.map(|p| p.raw()), "pane closed");
        (true, effects)
    }

    pub fn can_merge_panes(&self, target: PaneId, source: PaneId) -> bool {
        target != source && self.layout.splitter_between(target, source).is_some()
    }

    /// Folds `source` into `target`: tabs move over, every splitter touching
    /// `source` goes away and `target` grows by `source`'s extent.
    pub(crate) fn merge_panes(&mut self, target: PaneId, source: PaneId) -> bool {
        if !self.can_merge_panes(target, source) {
            return false;
        }
        let direction = self
            .layout
            .splitter_between(target, source)
            .and_then(|id| self.layout.splitter(id))
            .map(|s| s.direction);
        let Some(merged) = self.layout.panes.remove(&source) else {
            return false;
        };
        let gained = direction.map(|d| (d, merged.size.extent(d)));

        self.repoint_stacks(source, target);
        self.absorb_tabs(target, merged);
        if let (Some((direction, extent)), Some(pane)) = (gained, self.layout.pane_mut(target)) {
            let grown = pane.size.extent(direction) + extent;
            pane.size.set_extent(direction, grown);
        }
        self.layout.remove_splitters_touching(source);
        self.layout.sync_kind();
        if self.layout.active_pane == Some(source) {
            self.layout.active_pane = Some(target);
        }
        self.history.remove(&source);
        tracing::debug!(target = %target, source = %source, "panes merged");
        true
    }

    pub(crate) fn resize_pane(&mut self, pane: PaneId, width: f32, height: f32) -> bool {
        let min_width = self.config.min_pane_width;
        let min_height = self.config.min_pane_height;
        let Some(p) = self.layout.pane_mut(pane) else {
            return false;
        };
        let size = PaneSize::new(width.max(min_width), height.max(min_height));
        if p.size == size {
            return false;
        }
        p.size = size;
        true
    }

    /// Moves a splitter to `ratio` of the container. A side that would fall
    /// under the minimum extent is merged into the larger side instead.
    pub(crate) fn resize_split(&mut self, splitter: SplitterId, ratio: f32) -> bool {
        let Some(current) = self.layout.splitter(splitter).cloned() else {
            return false;
        };
        let ratio = self.config.clamp_ratio(ratio);
        let (container, min) = match current.direction {
            SplitDirection::Vertical => (self.config.container_width, self.config.min_pane_width),
            SplitDirection::Horizontal => {
                (self.config.container_height, self.config.min_pane_height)
            }
        };
        let extent_a = container * ratio;
        let extent_b = container - extent_a;

        if extent_a < min || extent_b < min {
            let (target, source) = if ratio >= 0.5 {
                (current.pane_a, current.pane_b)
            } else {
                (current.pane_b, current.pane_a)
            };
            tracing::debug!(splitter = %splitter, ratio, "split below minimum; merging");
            return self.merge_panes(target, source);
        }

        if let Some(s) = self.layout.splitters.get_mut(&splitter) {
            s.position = ratio;
        }
        if let Some(pane) = self.layout.pane_mut(current.pane_a) {
            pane.size.set_extent(current.direction, extent_a);
        }
        if let Some(pane) = self.layout.pane_mut(current.pane_b) {
            pane.size.set_extent(current.direction, extent_b);
        }
        true
    }

    /// Merges every undersized pane into a neighbor until none is left.
    pub(crate) fn auto_merge_panes(&mut self) -> bool {
        let mut changed = false;
        loop {
            let candidate = self.layout.panes().find_map(|pane| {
                if !self.config.is_below_min(pane.size.width, pane.size.height) {
                    return None;
                }
                self.layout
                    .neighbors(pane.id)
                    .first()
                    .map(|target| (*target, pane.id))
            });
            let Some((target, source)) = candidate else {
                break;
            };
            if !self.merge_panes(target, source) {
                break;
            }
            changed = true;
        }
        changed
    }

    /// Appends `source`'s tabs to `target`, keeping `source`'s active tab.
    fn absorb_tabs(&mut self, target: PaneId, source: Pane) {
        let mut moved = Vec::new();
        if let Some(pane) = self.layout.pane_mut(target) {
            for tab in source.tabs {
                if !pane.contains(tab) {
                    pane.tabs.push(tab);
                    moved.push(tab);
                }
            }
            match source.active_tab {
                Some(active) if pane.contains(active) => pane.active_tab = Some(active),
                _ if pane.active_tab.is_none() => pane.active_tab = pane.tabs.first().copied(),
                _ => {}
            }
        }
        for tab in moved {
            self.restack_for_pane(tab, target);
        }
    }

    fn repoint_stacks(&mut self, from: PaneId, to: PaneId) {
        for stack in self.stacks.values_mut() {
            if stack.pane_id == from {
                stack.pane_id = to;
            }
        }
    }

    /// Drops `tab` from its stack when the stack belongs to another pane.
    pub(crate) fn restack_for_pane(&mut self, tab: TabId, pane: PaneId) {
        let foreign = self
            .tabs
            .get(tab)
            .and_then(|t| t.stack_id)
            .and_then(|id| self.stacks.get(&id))
            .is_some_and(|s| s.pane_id != pane);
        if foreign {
            self.remove_tab_from_stack(tab);
        }
    }
}

use super::clock::{now_millis, Clock};
use super::ids::{GroupId, PaneId, StackId, TabId, WorkspaceLayoutId};
use super::{Action, Effect, WorkbenchState};

/// Id produced by an action, for callers that need to address the new entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Tab(TabId),
    Pane(PaneId),
    Group(GroupId),
    Stack(StackId),
    WorkspaceLayout(WorkspaceLayoutId),
}

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
    pub outcome: Option<Outcome>,
}

impl DispatchResult {
    fn changed(state_changed: bool) -> Self {
        Self {
            state_changed,
            ..Self::default()
        }
    }

    fn with_effects((state_changed, effects): (bool, Vec<Effect>)) -> Self {
        Self {
            effects,
            state_changed,
            outcome: None,
        }
    }

    fn produced(outcome: Option<Outcome>) -> Self {
        Self {
            effects: Vec::new(),
            state_changed: outcome.is_some(),
            outcome,
        }
    }

    pub fn tab(&self) -> Option<TabId> {
        match self.outcome {
            Some(Outcome::Tab(id)) => Some(id),
            _ => None,
        }
    }

    pub fn pane(&self) -> Option<PaneId> {
        match self.outcome {
            Some(Outcome::Pane(id)) => Some(id),
            _ => None,
        }
    }

    pub fn group(&self) -> Option<GroupId> {
        match self.outcome {
            Some(Outcome::Group(id)) => Some(id),
            _ => None,
        }
    }

    pub fn stack(&self) -> Option<StackId> {
        match self.outcome {
            Some(Outcome::Stack(id)) => Some(id),
            _ => None,
        }
    }

    pub fn workspace_layout(&self) -> Option<WorkspaceLayoutId> {
        match self.outcome {
            Some(Outcome::WorkspaceLayout(id)) => Some(id),
            _ => None,
        }
    }
}

/// Single writer over [`WorkbenchState`].
pub struct Store {
    state: WorkbenchState,
    clock: Clock,
}

impl Store {
    pub fn new(state: WorkbenchState) -> Self {
        Self::with_clock(state, now_millis)
    }

    pub fn with_clock(state: WorkbenchState, clock: Clock) -> Self {
        Self { state, clock }
    }

    pub fn state(&self) -> &WorkbenchState {
        &self.state
    }

    pub fn now(&self) -> u64 {
        (self.clock)()
    }

    /// Swaps in a restored state wholesale.
    pub fn replace_state(&mut self, state: WorkbenchState) {
        self.state = state;
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        let now = self.now();
        let result = self.reduce(action, now);
        debug_assert!(
            self.state.check_invariants().is_empty(),
            "invariants broken: {:?}",
            self.state.check_invariants()
        );
        result
    }

    fn reduce(&mut self, action: Action, now: u64) -> DispatchResult {
        let state = &mut self.state;
        match action {
            Action::CreatePane { size } => {
                DispatchResult::produced(Some(Outcome::Pane(state.create_pane(size))))
            }
            Action::SetActivePane { pane } => DispatchResult::changed(state.set_active_pane(pane)),
            Action::SplitPane { pane, direction } => {
                DispatchResult::produced(state.split_pane(pane, direction).map(Outcome::Pane))
            }
            Action::SplitPaneWithTab { tab, direction } => DispatchResult::produced(
                state
                    .split_pane_with_tab(tab, direction, now)
                    .map(Outcome::Pane),
            ),
            Action::ClosePane { pane } => DispatchResult::with_effects(state.close_pane(pane)),
            Action::MergePanes { target, source } => {
                DispatchResult::changed(state.merge_panes(target, source))
            }
            Action::ResizePane {
                pane,
                width,
                height,
            } => DispatchResult::changed(state.resize_pane(pane, width, height)),
            Action::ResizeSplit { splitter, ratio } => {
                DispatchResult::changed(state.resize_split(splitter, ratio))
            }
            Action::AutoMergePanes => DispatchResult::changed(state.auto_merge_panes()),

            Action::CreateTab { options, pane } => DispatchResult::produced(Some(Outcome::Tab(
                state.create_tab(options, pane, now),
            ))),
            Action::OpenFile {
                path,
                content,
                language,
                pane,
            } => DispatchResult::produced(Some(Outcome::Tab(
                state.open_file(path, content, language, pane, now),
            ))),
            Action::ActivateTab { tab } => DispatchResult::changed(state.activate_tab(tab, now)),
            Action::CloseTab { tab } => DispatchResult::with_effects(state.close_tab(tab)),
            Action::CloseOtherTabs { tab } => {
                DispatchResult::with_effects(state.close_other_tabs(tab, now))
            }
            Action::CloseAllTabs { pane } => DispatchResult::with_effects(state.close_all_tabs(pane)),
            Action::UpdateTab { tab, update } => {
                DispatchResult::with_effects(state.update_tab(tab, update, now))
            }
            Action::MoveTab {
                tab,
                from,
                to,
                index,
            } => DispatchResult::changed(state.move_tab(tab, from, to, index, now)),
            Action::DuplicateTab { tab } => {
                DispatchResult::produced(state.duplicate_tab(tab, now).map(Outcome::Tab))
            }
            Action::LockTab { tab, locked } => DispatchResult::changed(state.lock_tab(tab, locked)),
            Action::ReorderTab { tab, index } => {
                DispatchResult::changed(state.reorder_tab(tab, index))
            }
            Action::ClearRecentFiles => DispatchResult::changed(state.clear_recent_files()),

            Action::CreateGroup { name, color, tabs } => DispatchResult::produced(Some(
                Outcome::Group(state.create_group(name, color, tabs)),
            )),
            Action::AddTabToGroup { tab, group } => {
                DispatchResult::changed(state.add_tab_to_group(tab, group))
            }
            Action::RemoveTabFromGroup { tab } => {
                DispatchResult::changed(state.remove_tab_from_group(tab))
            }
            Action::UpdateGroup { group, name, color } => {
                DispatchResult::changed(state.update_group(group, name, color))
            }
            Action::DeleteGroup { group } => DispatchResult::changed(state.delete_group(group)),
            Action::ToggleGroupCollapsed { group } => {
                DispatchResult::changed(state.toggle_group_collapsed(group))
            }
            Action::LockGroup { group, locked } => {
                DispatchResult::changed(state.lock_group(group, locked))
            }

            Action::CreateStack { pane, tabs } => {
                DispatchResult::produced(state.create_stack(pane, tabs).map(Outcome::Stack))
            }
            Action::AddTabToStack { tab, stack } => {
                DispatchResult::changed(state.add_tab_to_stack(tab, stack))
            }
            Action::RemoveTabFromStack { tab } => {
                DispatchResult::changed(state.remove_tab_from_stack(tab))
            }
            Action::Unstack { stack } => DispatchResult::changed(state.unstack(stack)),
            Action::SetStackActiveIndex { stack, index } => {
                DispatchResult::changed(state.set_stack_active_index(stack, index))
            }
            Action::ToggleStack { stack } => DispatchResult::changed(state.toggle_stack(stack)),
            Action::AutoStackPane { pane } => {
                DispatchResult::produced(state.auto_stack_pane(pane).map(Outcome::Stack))
            }

            Action::LinkTabs { a, b } => DispatchResult::changed(state.link_tabs(a, b)),
            Action::UnlinkTabs { a, b } => DispatchResult::changed(state.unlink_tabs(a, b)),
            Action::LinkRelatedFiles { tab } => {
                DispatchResult::changed(state.link_related_files(tab))
            }

            Action::NavigateBack { pane } => {
                DispatchResult::produced(state.navigate_back(pane).map(Outcome::Tab))
            }
            Action::NavigateForward { pane } => {
                DispatchResult::produced(state.navigate_forward(pane).map(Outcome::Tab))
            }

            Action::SaveWorkspaceLayout { name, description } => DispatchResult::produced(Some(
                Outcome::WorkspaceLayout(state.save_workspace_layout(name, description, now)),
            )),
            Action::LoadWorkspaceLayout { id } => {
                DispatchResult::changed(state.load_workspace_layout(id))
            }
            Action::DeleteWorkspaceLayout { id } => {
                DispatchResult::changed(state.delete_workspace_layout(id))
            }
            Action::SetDefaultWorkspaceLayout { id } => {
                DispatchResult::changed(state.set_default_workspace_layout(id))
            }

            Action::UpdateSettings(settings) => {
                if state.settings == settings {
                    return DispatchResult::changed(false);
                }
                let disabled = state.settings.auto_save && !settings.auto_save;
                state.settings = settings;
                let effects = if disabled {
                    vec![Effect::CancelAllAutoSaves]
                } else {
                    Vec::new()
                };
                DispatchResult::with_effects((true, effects))
            }
            Action::MarkSaved { tab, modified_at } => {
                DispatchResult::changed(state.mark_saved(tab, modified_at))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;

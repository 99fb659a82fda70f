use std::path::PathBuf;

use super::ids::{GroupId, PaneId, SplitterId, StackId, TabId, WorkspaceLayoutId};
use super::layout::{PaneSize, SplitDirection};
use super::services::ports::WorkbenchSettings;
use super::tabs::{TabOptions, TabUpdate};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreatePane {
        size: Option<PaneSize>,
    },
    SetActivePane {
        pane: PaneId,
    },
    SplitPane {
        pane: PaneId,
        direction: SplitDirection,
    },
    SplitPaneWithTab {
        tab: TabId,
        direction: SplitDirection,
    },
    ClosePane {
        pane: PaneId,
    },
    MergePanes {
        target: PaneId,
        source: PaneId,
    },
    ResizePane {
        pane: PaneId,
        width: f32,
        height: f32,
    },
    ResizeSplit {
        splitter: SplitterId,
        ratio: f32,
    },
    AutoMergePanes,

    CreateTab {
        options: TabOptions,
        pane: Option<PaneId>,
    },
    OpenFile {
        path: PathBuf,
        content: String,
        language: Option<String>,
        pane: Option<PaneId>,
    },
    ActivateTab {
        tab: TabId,
    },
    CloseTab {
        tab: TabId,
    },
    CloseOtherTabs {
        tab: TabId,
    },
    CloseAllTabs {
        pane: PaneId,
    },
    UpdateTab {
        tab: TabId,
        update: TabUpdate,
    },
    MoveTab {
        tab: TabId,
        from: PaneId,
        to: PaneId,
        index: Option<usize>,
    },
    DuplicateTab {
        tab: TabId,
    },
    LockTab {
        tab: TabId,
        locked: bool,
    },
    ReorderTab {
        tab: TabId,
        index: usize,
    },
    ClearRecentFiles,

    CreateGroup {
        name: String,
        color: String,
        tabs: Vec<TabId>,
    },
    AddTabToGroup {
        tab: TabId,
        group: GroupId,
    },
    RemoveTabFromGroup {
        tab: TabId,
    },
    UpdateGroup {
        group: GroupId,
        name: Option<String>,
        color: Option<String>,
    },
    DeleteGroup {
        group: GroupId,
    },
    ToggleGroupCollapsed {
        group: GroupId,
    },
    LockGroup {
        group: GroupId,
        locked: bool,
    },

    CreateStack {
        pane: PaneId,
        tabs: Vec<TabId>,
    },
    AddTabToStack {
        tab: TabId,
        stack: StackId,
    },
    RemoveTabFromStack {
        tab: TabId,
    },
    Unstack {
        stack: StackId,
    },
    SetStackActiveIndex {
        stack: StackId,
        index: usize,
    },
    ToggleStack {
        stack: StackId,
    },
    AutoStackPane {
        pane: PaneId,
    },

    LinkTabs {
        a: TabId,
        b: TabId,
    },
    UnlinkTabs {
        a: TabId,
        b: TabId,
    },
    LinkRelatedFiles {
        tab: TabId,
    },

    NavigateBack {
        pane: PaneId,
    },
    NavigateForward {
        pane: PaneId,
    },

    SaveWorkspaceLayout {
        name: String,
        description: String,
    },
    LoadWorkspaceLayout {
        id: WorkspaceLayoutId,
    },
    DeleteWorkspaceLayout {
        id: WorkspaceLayoutId,
    },
    SetDefaultWorkspaceLayout {
        id: WorkspaceLayoutId,
    },

    UpdateSettings(WorkbenchSettings),
    /// A save finished; clears the dirty flag unless the tab changed since `modified_at`.
    MarkSaved {
        tab: TabId,
        modified_at: u64,
    },
}

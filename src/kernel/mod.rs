//! Headless pane/tab layout engine (state/action/effect).

pub mod action;
pub mod clock;
pub mod effect;
pub mod error;
pub mod groups;
pub mod history;
pub mod ids;
pub mod layout;
pub mod recovery;
pub mod related;
pub mod services;
pub mod snapshot;
pub mod stacks;
pub mod state;
pub mod store;
pub mod tabs;
pub mod workspace_layouts;

pub use action::Action;
pub use effect::Effect;
pub use error::{StateError, StateErrorKind, StorageError, WorkbenchError};
pub use groups::TabGroup;
pub use history::NavigationHistory;
pub use ids::{GroupId, PaneId, SplitterId, StackId, TabId, WorkspaceLayoutId};
pub use layout::{Layout, LayoutKind, LayoutNode, Pane, PaneSize, SplitDirection, Splitter};
pub use recovery::{recover_session, RecoveryReport};
pub use related::{find_related_files, RelatedFile, Relation};
pub use snapshot::{LayoutSnapshot, SessionSnapshot, SNAPSHOT_VERSION};
pub use stacks::TabStack;
pub use state::WorkbenchState;
pub use store::{DispatchResult, Outcome, Store};
pub use tabs::{Tab, TabOptions, TabRegistry, TabUpdate};
pub use workspace_layouts::WorkspaceLayout;

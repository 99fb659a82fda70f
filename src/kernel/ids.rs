use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

define_id!(TabId, "tab");
define_id!(PaneId, "pane");
define_id!(SplitterId, "splitter");
define_id!(GroupId, "group");
define_id!(StackId, "stack");
define_id!(
    /// Id of a saved [`crate::kernel::WorkspaceLayout`].
    WorkspaceLayoutId,
    "layout"
);

/// Monotonic id source shared by every entity kind.
///
/// A single counter keeps ids unique across kinds, which makes log lines and
/// storage keys unambiguous. After a restore the counter is bumped past the
/// largest id seen so freshly allocated ids never collide with restored ones.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    pub fn tab(&mut self) -> TabId {
        TabId::new(self.bump())
    }

    pub fn pane(&mut self) -> PaneId {
        PaneId::new(self.bump())
    }

    pub fn splitter(&mut self) -> SplitterId {
        SplitterId::new(self.bump())
    }

    pub fn group(&mut self) -> GroupId {
        GroupId::new(self.bump())
    }

    pub fn stack(&mut self) -> StackId {
        StackId::new(self.bump())
    }

    pub fn workspace_layout(&mut self) -> WorkspaceLayoutId {
        WorkspaceLayoutId::new(self.bump())
    }

    pub fn observe(&mut self, raw: u64) {
        if raw >= self.next {
            self.next = raw.saturating_add(1);
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/ids.rs"]
mod tests;

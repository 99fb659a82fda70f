//! Pane graph: panes are vertices, splitters are the edges between them.

mod graph;
mod state;

pub use state::{Layout, LayoutKind, LayoutNode, Pane, PaneSize, SplitDirection, Splitter};

#[cfg(test)]
#[path = "../../../tests/unit/kernel/layout/graph.rs"]
mod tests;

//! panekit - pane/tab layout engine for editor workbenches
//!
//! Module layout:
//! - kernel: headless state, actions and reducers (pane graph, tabs, groups,
//!   stacks, related tabs, history, snapshots, recovery)
//! - kernel::services: storage/lifecycle ports and their adapters
//! - app: the `Workbench` service with auto-save and session persistence
//! - logging: tracing setup

pub mod app;
pub mod kernel;
pub mod logging;

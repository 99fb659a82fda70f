//! Tab registry and the reducers that open, close and move tabs.

mod reducer;
mod state;

pub(crate) use state::file_name;
pub use state::{Tab, TabOptions, TabRegistry, TabUpdate, DEFAULT_LANGUAGE, UNTITLED};

#[cfg(test)]
#[path = "../../../tests/unit/kernel/tabs/reducer.rs"]
mod tests;

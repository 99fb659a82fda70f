//! Service ports: traits + data contracts.

pub mod config;
pub mod lifecycle;
pub mod settings;
pub mod storage;

pub use config::LayoutConfig;
pub use lifecycle::{BeforeUnload, HookFuture, LifecycleHooks};
pub use settings::{StackingStrategy, WorkbenchSettings, MIN_AUTO_SAVE_DELAY_MS};
pub use storage::{get_json, set_json, StorageAdapter, StorageFuture, StorageResult};

//! Service layer around the kernel: timers, persistence and host lifecycle.

pub mod autosave;
pub mod session;
pub mod workbench;

pub use autosave::{
    auto_save_key, sweep_expired, AutoSaveEntry, AutoSaveEvent, AutoSaveScheduler,
    RecoveredContent, SaveAllReport, AUTO_SAVE_PREFIX,
};
pub use session::{SessionPersistence, SESSION_KEY};
pub use workbench::{document_key, DocumentRecord, Workbench, DOCUMENT_PREFIX};
